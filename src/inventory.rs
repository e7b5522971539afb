use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WesternizerError};

/// Substring that marks a ladder image, matched case-insensitively
pub const LADDER_TAG: &str = "lad";

/// One image on disk with its pixel size
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    /// Lower-cased file stem
    pub normalized_id: String,
    pub file_path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageRecord {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }
}

/// Checks whether the file name ends with one of `extensions`, ignoring case
pub fn has_recognized_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// File stem exactly as on disk
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lower-cased file stem, the identifier used for tables and matching
pub fn normalized_id(path: &Path) -> String {
    file_stem(path).to_lowercase()
}

pub fn is_ladder(path: &Path) -> bool {
    normalized_id(path).contains(LADDER_TAG)
}

/// Gel images in `dir`, sorted by file name
///
/// Ladder images and files with unknown extensions are left out.
///
/// # Returns
/// * `Err(NoImagesFound)` when nothing survives the filter
pub fn list_gel_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| has_recognized_extension(path, extensions))
        .filter(|path| !is_ladder(path))
        .collect();

    if files.is_empty() {
        return Err(WesternizerError::NoImagesFound {
            dir: dir.to_path_buf(),
            extensions: extensions.join(", "),
        });
    }

    files.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));
    Ok(files)
}

/// Normalized ids of the gel images in `dir`
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use westernizer::inventory::scan_gel_images;
///
/// let extensions = vec![".tif".to_string(), ".png".to_string()];
/// match scan_gel_images(Path::new("Insert WB"), &extensions) {
///     Ok(ids) => println!("{} gel images", ids.len()),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn scan_gel_images(dir: &Path, extensions: &[String]) -> Result<Vec<String>> {
    let files = list_gel_files(dir, extensions)?;
    Ok(files.iter().map(|path| normalized_id(path)).collect())
}

/// Reads the pixel size from the image header
///
/// The file is closed before returning; a zero-sized image is rejected so
/// callers can divide by the height.
pub fn read_image_record(path: &Path) -> Result<ImageRecord> {
    let (width_px, height_px) =
        image::image_dimensions(path).map_err(|source| WesternizerError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;

    if width_px == 0 || height_px == 0 {
        return Err(WesternizerError::EmptyImage {
            path: path.to_path_buf(),
            width: width_px,
            height: height_px,
        });
    }

    Ok(ImageRecord {
        normalized_id: normalized_id(path),
        file_path: path.to_path_buf(),
        width_px,
        height_px,
    })
}
