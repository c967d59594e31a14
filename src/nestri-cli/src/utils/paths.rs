//! Path utilities for the nestri CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory under the user's home that holds installed games.
pub const GAME_DIR_NAME: &str = "game";

/// Expand a leading `~/` to the user's home directory.
///
/// The path is returned unchanged when it has no `~/` prefix or the home
/// directory is unknown.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest).to_string_lossy().to_string();
    }
    path.to_string()
}

/// The games directory, `~/game`.
pub fn game_directory() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(GAME_DIR_NAME))
        .context("Could not determine the home directory")
}
