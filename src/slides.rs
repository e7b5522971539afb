use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::deck::{ContentSlide, DeckBuilder, TitleSlide};
use crate::error::Result;
use crate::geometry::plan_slide;
use crate::inventory::{file_stem, read_image_record};
use crate::resolver::{MarkerIndex, MarkerResolution};
use crate::table::ConditionLabel;

/// Counts reported after the deck is assembled
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    pub content_slides: usize,
    pub skipped_images: Vec<PathBuf>,
    pub markers_placed: usize,
}

/// Marker file to overlay on the slide for `image`, logging why when there is none
pub fn marker_for(index: &MarkerIndex, image: &Path, config: &RunConfig) -> Option<PathBuf> {
    let filename = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match index.resolve(&filename, &config.marker_dir, &config.extensions) {
        MarkerResolution::Found { antibody, path } => {
            log::debug!("{} matched '{}', marker {}", filename, antibody, path.display());
            Some(path)
        }
        MarkerResolution::Unmatched => {
            log::warn!("No matching marker found for {}. Skipping marker image.", filename);
            None
        }
        MarkerResolution::EmptyLabel { antibody } => {
            log::warn!("No marker filled in for '{}' ({}). Skipping marker image.", antibody, filename);
            None
        }
        MarkerResolution::NotFound { antibody, label } => {
            log::warn!(
                "Marker image '{}' for '{}' not found in {} ({})",
                label,
                antibody,
                config.marker_dir.display(),
                filename
            );
            None
        }
    }
}

/// Builds one content slide, or an error if the gel image cannot be read
///
/// A marker that cannot be read only loses its overlay.
pub fn build_content_slide(
    image: &Path,
    marker: Option<PathBuf>,
    conditions: Option<&[ConditionLabel]>,
    config: &RunConfig,
) -> Result<ContentSlide> {
    let record = read_image_record(image)?;

    let marker = marker.and_then(|path| match read_image_record(&path) {
        Ok(marker_record) => Some((path, marker_record.dimensions())),
        Err(e) => {
            log::warn!("Could not open marker image: {}", e);
            None
        }
    });

    let plan = plan_slide(
        &config.canvas,
        record.dimensions(),
        marker.as_ref().map(|(_, size)| *size),
        conditions.map(<[ConditionLabel]>::len),
    );

    Ok(ContentSlide {
        image: record.file_path,
        marker: marker.map(|(path, _)| path),
        caption: file_stem(image),
        conditions: conditions.map(<[ConditionLabel]>::to_vec).unwrap_or_default(),
        plan,
    })
}

/// Draws the title slide and one slide per gel image into `deck`
///
/// # Arguments
/// * `deck` - Output document
/// * `images` - Gel image paths, already sorted
/// * `index` - Antibody to marker mapping from the workbook
/// * `conditions` - Condition labels, placed according to the label policy
/// * `config` - Run context (canvas, marker folder, date, policy)
pub fn assemble_deck(
    deck: &mut dyn DeckBuilder,
    images: &[PathBuf],
    index: &MarkerIndex,
    conditions: &[ConditionLabel],
    config: &RunConfig,
) -> Result<AssemblySummary> {
    deck.add_title_slide(&TitleSlide::summary(index.keys(), &config.display_date))?;

    let mut summary = AssemblySummary::default();
    for image in images {
        let marker = marker_for(index, image, config);
        let labels = config
            .label_policy
            .renders_on(summary.content_slides)
            .then_some(conditions);

        let slide = match build_content_slide(image, marker, labels, config) {
            Ok(slide) => slide,
            Err(e) if e.is_per_image() => {
                log::error!("{}", e);
                summary.skipped_images.push(image.clone());
                continue;
            }
            Err(e) => return Err(e),
        };

        if slide.marker.is_some() {
            summary.markers_placed += 1;
        }
        deck.add_content_slide(&slide)?;
        summary.content_slides += 1;
        log::info!("Added slide {} for {}", deck.slide_count(), slide.caption);
    }

    Ok(summary)
}
