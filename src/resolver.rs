use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// What the resolver decided for one gel image
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkerResolution {
    /// A marker image exists for the matched antibody
    Found { antibody: String, path: PathBuf },
    /// No antibody name occurs in the file name
    Unmatched,
    /// The matched antibody has no marker filled in
    EmptyLabel { antibody: String },
    /// A marker was named but no file with a known extension exists
    NotFound { antibody: String, label: String },
}

impl MarkerResolution {
    pub fn path(&self) -> Option<&Path> {
        match self {
            MarkerResolution::Found { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Antibody key to marker label, in the order rows appear in the sheet
///
/// Matching is first-match by substring, so ordering decides between keys
/// that both occur in one file name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerIndex {
    entries: IndexMap<String, String>,
}

impl MarkerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or updates a key; an existing key keeps its position
    pub fn insert(&mut self, antibody_key: impl Into<String>, marker_label: impl Into<String>) {
        self.entries.insert(antibody_key.into(), marker_label.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First key contained in `filename_lower`, with its label
    ///
    /// # Examples
    /// ```
    /// use westernizer::resolver::MarkerIndex;
    ///
    /// let mut index = MarkerIndex::new();
    /// index.insert("actin", "42");
    /// index.insert("gapdh", "");
    /// assert_eq!(index.match_antibody("sample_actin_1.tif"), Some(("actin", "42")));
    /// assert_eq!(index.match_antibody("tubulin.tif"), None);
    /// ```
    pub fn match_antibody(&self, filename_lower: &str) -> Option<(&str, &str)> {
        self.iter()
            .find(|(key, _)| !key.is_empty() && filename_lower.contains(key))
    }

    /// Decides which marker image, if any, goes on the slide for `filename`
    ///
    /// Only the first matching key is tried: an empty label or a missing
    /// file does not fall through to later keys that also match.
    pub fn resolve(&self, filename: &str, marker_dir: &Path, extensions: &[String]) -> MarkerResolution {
        let filename_lower = filename.to_lowercase();
        let Some((antibody, label)) = self.match_antibody(&filename_lower) else {
            return MarkerResolution::Unmatched;
        };

        if label.is_empty() {
            return MarkerResolution::EmptyLabel {
                antibody: antibody.to_string(),
            };
        }

        match find_marker_file(marker_dir, label, extensions) {
            Some(path) => MarkerResolution::Found {
                antibody: antibody.to_string(),
                path,
            },
            None => MarkerResolution::NotFound {
                antibody: antibody.to_string(),
                label: label.to_string(),
            },
        }
    }
}

/// `marker_dir/<label><ext>` for the first extension that exists on disk
pub fn find_marker_file(marker_dir: &Path, label: &str, extensions: &[String]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| marker_dir.join(format!("{label}{ext}")))
        .find(|candidate| candidate.exists())
}
