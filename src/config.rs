use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::geometry::Canvas;

/// Image extensions accepted everywhere, in marker lookup preference order
pub const IMAGE_EXTENSIONS: [&str; 4] = [".tif", ".jpg", ".png", ".jpeg"];

pub const WB_DIR_NAME: &str = "Insert WB";
pub const MARKER_DIR_NAME: &str = "Insert MARKER";
pub const PPT_DIR_NAME: &str = "Output PowerPoint";
pub const EXCEL_DIR_NAME: &str = "Output Excel";

/// Where the condition label grid is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LabelPolicy {
    /// Only on the first content slide
    #[default]
    FirstSlide,
    /// On every content slide
    EverySlide,
}

impl LabelPolicy {
    /// Whether the content slide at `slide_index` (0-based) carries the grid
    pub fn renders_on(self, slide_index: usize) -> bool {
        match self {
            LabelPolicy::FirstSlide => slide_index == 0,
            LabelPolicy::EverySlide => true,
        }
    }
}

/// Explicit context for one run, built once at startup
///
/// Holds every directory, output path and date string the pipeline needs,
/// so nothing downstream reaches for globals or the clock.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub base_dir: PathBuf,
    pub wb_dir: PathBuf,
    pub marker_dir: PathBuf,
    pub ppt_dir: PathBuf,
    pub excel_dir: PathBuf,
    pub excel_path: PathBuf,
    pub ppt_path: PathBuf,
    /// Date shown under the title, e.g. `24.03.07`
    pub display_date: String,
    pub canvas: Canvas,
    pub extensions: Vec<String>,
    pub label_policy: LabelPolicy,
    /// Launch the workbook and deck in their default applications
    pub open_outputs: bool,
}

impl RunConfig {
    /// Builds the standard folder layout under `base_dir`
    ///
    /// # Arguments
    /// * `base_dir` - Folder holding `Insert WB`, `Insert MARKER` and the outputs
    /// * `now` - Timestamp used for output file names and the title date
    ///
    /// # Examples
    /// ```
    /// use chrono::{Local, TimeZone};
    /// use westernizer::config::RunConfig;
    ///
    /// let now = Local.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap();
    /// let config = RunConfig::new("/tmp/lab", now);
    /// assert_eq!(config.display_date, "24.03.07");
    /// assert!(config.ppt_path.ends_with("240307 1405 SUM.pptx"));
    /// ```
    pub fn new(base_dir: impl AsRef<Path>, now: DateTime<Local>) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let stamp = now.format("%y%m%d %H%M").to_string();

        let wb_dir = base_dir.join(WB_DIR_NAME);
        let marker_dir = base_dir.join(MARKER_DIR_NAME);
        let ppt_dir = base_dir.join(PPT_DIR_NAME);
        let excel_dir = base_dir.join(EXCEL_DIR_NAME);
        let excel_path = excel_dir.join(format!("{stamp} WB Template.xlsx"));
        let ppt_path = ppt_dir.join(format!("{stamp} SUM.pptx"));

        RunConfig {
            base_dir,
            wb_dir,
            marker_dir,
            ppt_dir,
            excel_dir,
            excel_path,
            ppt_path,
            display_date: now.format("%y.%m.%d").to_string(),
            canvas: Canvas::default(),
            extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            label_policy: LabelPolicy::default(),
            open_outputs: true,
        }
    }

    pub fn with_label_policy(mut self, policy: LabelPolicy) -> Self {
        self.label_policy = policy;
        self
    }

    pub fn with_open_outputs(mut self, open: bool) -> Self {
        self.open_outputs = open;
        self
    }

    /// The four working folders, inputs first
    pub fn directories(&self) -> [&Path; 4] {
        [
            self.wb_dir.as_path(),
            self.marker_dir.as_path(),
            self.ppt_dir.as_path(),
            self.excel_dir.as_path(),
        ]
    }

    /// Creates any of the working folders that do not exist yet
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in self.directories() {
            std::fs::create_dir_all(dir)?;
            log::debug!("Ensured directory {}", dir.display());
        }
        Ok(())
    }
}
