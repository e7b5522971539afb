use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::geometry::SlideGeometryPlan;
use crate::table::ConditionLabel;

/// Opening slide: antibody list and date
#[derive(Clone, Debug, PartialEq)]
pub struct TitleSlide {
    pub title: String,
    pub subtitle: String,
}

impl TitleSlide {
    /// `WB Summary: A, B, C` from the antibody keys
    pub fn summary<'a>(antibody_keys: impl IntoIterator<Item = &'a str>, date: &str) -> Self {
        let names: Vec<String> = antibody_keys.into_iter().map(str::to_uppercase).collect();
        TitleSlide {
            title: format!("WB Summary: {}", names.join(", ")),
            subtitle: date.to_string(),
        }
    }
}

/// One gel slide, fully placed
#[derive(Clone, Debug, PartialEq)]
pub struct ContentSlide {
    pub image: PathBuf,
    pub marker: Option<PathBuf>,
    /// Filename stem shown top-left
    pub caption: String,
    /// Labels for `plan.labels`, same length when present
    pub conditions: Vec<ConditionLabel>,
    pub plan: SlideGeometryPlan,
}

/// Output document the assembler draws into
pub trait DeckBuilder {
    fn add_title_slide(&mut self, slide: &TitleSlide) -> Result<()>;

    fn add_content_slide(&mut self, slide: &ContentSlide) -> Result<()>;

    fn slide_count(&self) -> usize;

    fn save(&mut self, path: &Path) -> Result<()>;
}
