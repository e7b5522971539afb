use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::error::{Result, WesternizerError};

/// Answer to a blocking prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acknowledgement {
    Proceed,
    Cancel,
}

impl Acknowledgement {
    /// `Err(Cancelled)` for `Cancel`, naming the step that was cancelled
    pub fn or_cancelled(self, step: &str) -> Result<()> {
        match self {
            Acknowledgement::Proceed => Ok(()),
            Acknowledgement::Cancel => Err(WesternizerError::Cancelled {
                step: step.to_string(),
            }),
        }
    }
}

/// The points where the run waits for the user
pub trait UserPrompt {
    /// Gel images have been copied into `wb_dir`
    fn confirm_images_placed(&mut self, wb_dir: &Path) -> Acknowledgement;

    /// The workbook at `path` has been filled in and saved
    fn confirm_table_filled(&mut self, path: &Path) -> Acknowledgement;

    /// Informational; the deck at `path` is written
    fn notify_deck_saved(&mut self, path: &Path);
}

fn images_message(wb_dir: &Path) -> String {
    format!(
        "Place Western Blot images in \"{}\" and click OK when done.",
        wb_dir.display()
    )
}

fn table_message(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("Fill out '{}' and SAVE it. Click OK when done.", name)
}

fn saved_message(path: &Path) -> String {
    format!("Presentation is completed and saved in \"{}\".", path.display())
}

/// Terminal prompt: Enter continues, `q` cancels
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        ConsolePrompt {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompt { input, output }
    }

    fn ask(&mut self, message: &str) -> Acknowledgement {
        let shown = write!(self.output, "{} [Enter = OK, q = cancel] ", message)
            .and_then(|_| self.output.flush());
        if let Err(e) = shown {
            log::debug!("Could not write prompt: {}", e);
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            // Closed input behaves like OK, same as closing a dialog
            Ok(_) if answer.trim().eq_ignore_ascii_case("q") => Acknowledgement::Cancel,
            _ => Acknowledgement::Proceed,
        }
    }
}

impl<R: BufRead, W: Write> UserPrompt for ConsolePrompt<R, W> {
    fn confirm_images_placed(&mut self, wb_dir: &Path) -> Acknowledgement {
        self.ask(&images_message(wb_dir))
    }

    fn confirm_table_filled(&mut self, path: &Path) -> Acknowledgement {
        self.ask(&table_message(path))
    }

    fn notify_deck_saved(&mut self, path: &Path) {
        if let Err(e) = writeln!(self.output, "{}", saved_message(path)) {
            log::debug!("Could not write completion notice: {}", e);
        }
    }
}

/// Never waits; for scripted runs where inputs are already in place
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoConfirm;

impl UserPrompt for AutoConfirm {
    fn confirm_images_placed(&mut self, wb_dir: &Path) -> Acknowledgement {
        log::info!("{}", images_message(wb_dir));
        Acknowledgement::Proceed
    }

    fn confirm_table_filled(&mut self, path: &Path) -> Acknowledgement {
        log::info!("{}", table_message(path));
        Acknowledgement::Proceed
    }

    fn notify_deck_saved(&mut self, path: &Path) {
        log::info!("{}", saved_message(path));
    }
}

/// Native message boxes
#[cfg(feature = "dialogs")]
#[derive(Clone, Copy, Debug, Default)]
pub struct DialogPrompt;

#[cfg(feature = "dialogs")]
impl DialogPrompt {
    fn ask(title: &str, message: &str) -> Acknowledgement {
        use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::OkCancel)
            .show();
        match result {
            MessageDialogResult::Cancel | MessageDialogResult::No => Acknowledgement::Cancel,
            _ => Acknowledgement::Proceed,
        }
    }
}

#[cfg(feature = "dialogs")]
impl UserPrompt for DialogPrompt {
    fn confirm_images_placed(&mut self, wb_dir: &Path) -> Acknowledgement {
        Self::ask("Insert WB Images", &images_message(wb_dir))
    }

    fn confirm_table_filled(&mut self, path: &Path) -> Acknowledgement {
        Self::ask("Fill Excel", &table_message(path))
    }

    fn notify_deck_saved(&mut self, path: &Path) {
        use rfd::{MessageButtons, MessageDialog, MessageLevel};

        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Opening Completed PPT")
            .set_description(saved_message(path))
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
