//! Executable discovery through the OS command locator

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::runner::CommandRunner;

/// The platform's command locator
#[cfg(windows)]
pub const LOCATOR: &str = "where";

/// The platform's command locator
#[cfg(not(windows))]
pub const LOCATOR: &str = "which";

/// Find `name` on this host, returning the first path the locator reports
///
/// Absence is an expected outcome (no NVIDIA driver installed), so every
/// failure is logged as a warning and reported as `None`.
pub fn find_command<R: CommandRunner + ?Sized>(runner: &R, name: &str) -> Option<PathBuf> {
    let output = match runner.run(LOCATOR, &[name]) {
        Ok(output) => output,
        Err(e) => {
            warn!("failed to find the '{}' command: {}", name, e);
            return None;
        }
    };

    if !output.success() {
        warn!(
            "failed to find the '{}' command: '{}' returned code {:?}",
            name, LOCATOR, output.status
        );
        return None;
    }

    match output.stdout.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(first) => {
            debug!("Found '{}' at {}", name, first);
            Some(PathBuf::from(first))
        }
        None => {
            warn!("the '{}' command not found", name);
            None
        }
    }
}
