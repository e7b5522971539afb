use std::path::PathBuf;

use crate::config::RunConfig;
use crate::deck::DeckBuilder;
use crate::downloader::XlsxTableWriter;
use crate::error::Result;
use crate::inventory::{list_gel_files, scan_gel_images};
use crate::launcher::open_in_default_app;
use crate::loader::XlsxTableReader;
use crate::pptx::PptxDeck;
use crate::prompt::UserPrompt;
use crate::slides::{AssemblySummary, assemble_deck};
use crate::table::{MetadataSheet, MetadataTable, TableReader, TableWriter};

/// What a finished run produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub excel_path: PathBuf,
    pub ppt_path: PathBuf,
    pub antibodies: usize,
    pub conditions: usize,
    pub assembly: AssemblySummary,
}

/// Document collaborators for one run
pub struct Collaborators<'a> {
    pub prompt: &'a mut dyn UserPrompt,
    pub table_writer: &'a dyn TableWriter,
    pub table_reader: &'a dyn TableReader,
    pub deck: &'a mut dyn DeckBuilder,
}

/// Runs the whole workflow with the xlsx and pptx implementations
pub fn run(config: &RunConfig, prompt: &mut dyn UserPrompt) -> Result<RunReport> {
    let mut deck = PptxDeck::new(config.canvas);
    run_with(
        config,
        Collaborators {
            prompt,
            table_writer: &XlsxTableWriter,
            table_reader: &XlsxTableReader,
            deck: &mut deck,
        },
    )
}

/// Runs the workflow against arbitrary collaborators
///
/// 1. create the working folders and wait for the gel images
/// 2. write the template and wait for the user to fill it in
/// 3. read it back, resolve markers and write the deck
///
/// Stops with `NoImagesFound` before any document is written, and with
/// `NoConditionsFound` before the deck is started.
pub fn run_with(config: &RunConfig, collab: Collaborators<'_>) -> Result<RunReport> {
    let Collaborators {
        prompt,
        table_writer,
        table_reader,
        deck,
    } = collab;

    config.ensure_directories()?;

    prompt
        .confirm_images_placed(&config.wb_dir)
        .or_cancelled("placing images")?;

    let antibody_ids = scan_gel_images(&config.wb_dir, &config.extensions)?;
    log::info!("Found {} gel images in {}", antibody_ids.len(), config.wb_dir.display());

    let template = MetadataTable::seeded(&antibody_ids);
    table_writer.write(&template, &config.excel_path)?;
    if config.open_outputs {
        open_in_default_app(&config.excel_path);
    }

    prompt
        .confirm_table_filled(&config.excel_path)
        .or_cancelled("filling the workbook")?;

    let table = table_reader.read(&config.excel_path)?;
    let sheet = MetadataSheet::from_table(&table)?;

    for antibody in &sheet.antibodies {
        log::info!("Antibody: {}", antibody.antibody_name);
    }
    let index = sheet.marker_index();
    for (key, marker) in index.iter() {
        log::info!("{}: {}", key, marker);
    }

    let images = list_gel_files(&config.wb_dir, &config.extensions)?;
    let assembly = assemble_deck(deck, &images, &index, &sheet.conditions, config)?;
    if !assembly.skipped_images.is_empty() {
        log::warn!("{} images could not be opened", assembly.skipped_images.len());
    }

    deck.save(&config.ppt_path)?;
    log::info!("Saved: {}", config.ppt_path.display());

    prompt.notify_deck_saved(&config.ppt_path);
    if config.open_outputs {
        open_in_default_app(&config.ppt_path);
    }

    Ok(RunReport {
        excel_path: config.excel_path.clone(),
        ppt_path: config.ppt_path.clone(),
        antibodies: sheet.antibodies.len(),
        conditions: sheet.conditions.len(),
        assembly,
    })
}
