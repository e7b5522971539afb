use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, WesternizerError>;

/// Everything that can stop a run, or stop one slide from being built
#[derive(Debug, Error)]
pub enum WesternizerError {
    /// The gel folder holds no usable image (fatal)
    #[error("no images found in '{}' (expected extensions: {extensions})", dir.display())]
    NoImagesFound { dir: PathBuf, extensions: String },

    /// The Conditions column was left empty (fatal)
    #[error("no conditions found in the workbook; fill out the 'Conditions' column and try again")]
    NoConditionsFound,

    #[error("workbook has no header row")]
    EmptyWorkbook,

    #[error("workbook is missing the '{column}' column")]
    MissingColumn { column: String },

    /// Header could not be read for one image; only that image is affected
    #[error("could not open image {}: {source}", path.display())]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {} has zero size ({width}x{height})", path.display())]
    EmptyImage { path: PathBuf, width: u32, height: u32 },

    /// The user pressed Cancel on a prompt
    #[error("cancelled by user at: {step}")]
    Cancelled { step: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("failed to write presentation: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl WesternizerError {
    /// Per-image failures are logged and skipped, everything else ends the run
    pub fn is_per_image(&self) -> bool {
        matches!(
            self,
            WesternizerError::ImageOpen { .. } | WesternizerError::EmptyImage { .. }
        )
    }
}
