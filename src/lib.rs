/*!
# Westernizer

Turns a folder of Western Blot gel images into an annotated slide deck, with a
fill-in spreadsheet in between for the per-antibody metadata.

## Overview

A lab run usually ends with a stack of gel photos named after the antibody
they were probed with, plus a few molecular-weight ladder shots. This tool
collects them into one `.pptx` summary: a title slide listing every antibody,
then one slide per gel with the matching marker image pinned in the corner and
the sample conditions laid out above the lanes.

## Workflow

1. Create `Insert WB`, `Insert MARKER`, `Output Excel` and `Output PowerPoint`
   under the base folder, and wait for the user to drop the gel images in.
2. Write `<stamp> WB Template.xlsx`: one row per gel image (ladders excluded),
   columns for volume, gel %, marker, catalog number, dilution and conditions.
3. Wait for the user to fill it in, then read it back.
4. Build the deck: each gel image is centered at full slide height, its marker
   (found by antibody name in the file name) goes bottom-right, condition
   labels sit on connector lines across the middle.

## Architecture

### Layout core (pure)
- **geometry**: aspect-preserving fit, centering, corner pinning, condition
  grid, fixed annotations; all in centimetres
- **resolver**: antibody key to marker label, first substring match wins
- **table**: template schema, cell model, marker cleaning, sheet validation

### Collaborators
- **inventory**: directory scan and image header reads
- **downloader** / **loader**: xlsx template writer and reader
- **deck** / **pptx**: the `DeckBuilder` interface and its OOXML writer
- **prompt**: blocking confirmations (console, automatic, native dialogs)
- **launcher**: open a file in the default application

### Orchestration
- **config**: the run context, built once
- **slides**: title and content slide assembly
- **app**: the full sequence, with early exit on missing input

## Errors

Fatal conditions (`NoImagesFound`, `NoConditionsFound`, a cancelled prompt,
I/O) end the run. An unreadable gel image only drops its slide; a missing or
unreadable marker only drops the overlay.
*/

pub mod app;
pub mod config;
pub mod deck;
pub mod downloader;
pub mod error;
pub mod geometry;
pub mod inventory;
pub mod launcher;
pub mod loader;
pub mod pptx;
pub mod pptx_parts;
pub mod prompt;
pub mod resolver;
pub mod slides;
pub mod table;

/// Re-export the types most callers need
pub use config::{LabelPolicy, RunConfig};
pub use deck::{ContentSlide, DeckBuilder, TitleSlide};
pub use error::{Result, WesternizerError};
pub use geometry::{Canvas, Rect, SlideGeometryPlan};
pub use inventory::ImageRecord;
pub use resolver::{MarkerIndex, MarkerResolution};
pub use table::{AntibodyMetadata, CellValue, ConditionLabel, MetadataSheet, MetadataTable};
