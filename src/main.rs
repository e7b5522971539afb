#![cfg(not(tarpaulin_include))]

use chrono::Local;
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;

use westernizer::app;
use westernizer::config::{LabelPolicy, RunConfig};
use westernizer::prompt::{AutoConfirm, ConsolePrompt, UserPrompt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PromptMode {
    /// Native message boxes (needs the `dialogs` feature)
    Dialog,
    /// Wait for Enter in the terminal
    Console,
    /// Do not wait at all
    None,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Labels {
    /// Condition labels on the first gel slide only
    FirstSlide,
    /// Condition labels on every gel slide
    EverySlide,
}

impl From<Labels> for LabelPolicy {
    fn from(labels: Labels) -> Self {
        match labels {
            Labels::FirstSlide => LabelPolicy::FirstSlide,
            Labels::EverySlide => LabelPolicy::EverySlide,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "westernizer",
    about = "Build a Western Blot summary deck from a folder of gel images",
    version
)]
struct Cli {
    /// Folder holding "Insert WB", "Insert MARKER" and the output folders
    #[arg(short = 'd', long = "base-dir")]
    base_dir: Option<PathBuf>,

    /// How to wait for the user between steps
    #[arg(long, value_enum, default_value_t = PromptMode::Console)]
    prompt: PromptMode,

    /// Which gel slides carry the condition labels
    #[arg(long, value_enum, default_value_t = Labels::FirstSlide)]
    labels: Labels,

    /// Do not open the workbook and deck after writing them
    #[arg(long = "no-open")]
    no_open: bool,
}

fn make_prompt(mode: PromptMode) -> Result<Box<dyn UserPrompt>, Box<dyn Error>> {
    match mode {
        PromptMode::Console => Ok(Box::new(ConsolePrompt::stdio())),
        PromptMode::None => Ok(Box::new(AutoConfirm)),
        #[cfg(feature = "dialogs")]
        PromptMode::Dialog => Ok(Box::new(westernizer::prompt::DialogPrompt)),
        #[cfg(not(feature = "dialogs"))]
        PromptMode::Dialog => Err("dialog prompts require the 'dialogs' feature".into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let config = RunConfig::new(&base_dir, Local::now())
        .with_label_policy(cli.labels.into())
        .with_open_outputs(!cli.no_open);

    let mut prompt = make_prompt(cli.prompt)?;

    match app::run(&config, prompt.as_mut()) {
        Ok(report) => {
            log::info!(
                "Done: {} slides, {} markers placed, {} images skipped",
                report.assembly.content_slides,
                report.assembly.markers_placed,
                report.assembly.skipped_images.len()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            Err(e.into())
        }
    }
}
