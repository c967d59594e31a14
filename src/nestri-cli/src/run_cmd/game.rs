//! Game selection and host preparation for `nestri run`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::config::NestriConfig;

/// Length of a generated session id.
pub const SESSION_ID_LEN: usize = 16;

/// Pick the game to run, recording an explicit choice in `config`.
///
/// Returns the game and whether `config` changed.
pub fn resolve_game(requested: Option<&str>, config: &mut NestriConfig) -> Result<(String, bool)> {
    if let Some(game) = requested {
        let changed = config.game.as_deref() != Some(game);
        config.game = Some(game.to_string());
        return Ok((game.to_string(), changed));
    }

    let Some(game) = config.game.clone() else {
        bail!("no game specified and no previous game selected");
    };

    let is_exe = Path::new(&game)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
    if !is_exe {
        bail!("the previously selected game '{game}' is not an .exe file");
    }

    Ok((game, false))
}

/// `VERSION*` lines of an os-release file.
pub fn os_release_version(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("VERSION"))
        .collect()
}

/// Sorted entry names of the game directory.
pub fn list_games(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read game directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
}

/// Random alphanumeric id passed to the server as `SESSION_ID`.
pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
