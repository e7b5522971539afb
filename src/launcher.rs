use std::path::Path;
use std::process::Command;

/// Opens `path` with the desktop's default application
///
/// Failures are logged, never fatal: the file is already saved.
pub fn open_in_default_app(path: &Path) {
    let status = default_app_command(path).status();
    match status {
        Ok(s) if s.success() => log::debug!("Opened {}", path.display()),
        Ok(s) => log::warn!("Opening {} exited with {}", path.display(), s),
        Err(e) => log::warn!("Could not open {}: {}", path.display(), e),
    }
}

#[cfg(target_os = "macos")]
fn default_app_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn default_app_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_app_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}
