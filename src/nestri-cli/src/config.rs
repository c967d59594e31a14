//! Nestri home directory and `config.toml`.
//!
//! The home directory is `~/.nestri`, or `NESTRI_HOME` when set. Every key in
//! the config file is optional:
//!
//! ```toml
//! game = "/home/me/game/Game.exe"
//!
//! [container]
//! name = "netris"
//! image = "ghcr.io/netrisdotme/netris/server:nightly"
//! sudo = true
//! port = 8080
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the nestri home directory.
pub const NESTRI_HOME_ENV: &str = "NESTRI_HOME";

/// Home directory name under the user's home.
pub const HOME_DIR_NAME: &str = ".nestri";

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Default server container name.
pub const DEFAULT_CONTAINER_NAME: &str = "netris";

/// Default server container image.
pub const DEFAULT_CONTAINER_IMAGE: &str = "ghcr.io/netrisdotme/netris/server:nightly";

/// Default UDP port published by the server container.
pub const DEFAULT_STREAM_PORT: u16 = 8080;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory could be determined.
    #[error("Could not determine the home directory; set NESTRI_HOME")]
    NoHomeDir,

    /// The config file exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config file could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Find the nestri home directory.
///
/// Checks `NESTRI_HOME` first (relative values are resolved against the
/// current directory), then falls back to `~/.nestri`.
pub fn find_nestri_home() -> Result<PathBuf, ConfigError> {
    if let Ok(val) = std::env::var(NESTRI_HOME_ENV)
        && !val.is_empty()
    {
        let path = PathBuf::from(&val);
        let path = if path.is_relative() {
            std::env::current_dir()
                .map(|cwd| cwd.join(&path))
                .unwrap_or(path)
        } else {
            path
        };
        debug!(path = %path.display(), "Using NESTRI_HOME");
        return Ok(path);
    }

    dirs::home_dir()
        .map(|home| home.join(HOME_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// Path of the config file inside the nestri home directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(find_nestri_home()?.join(CONFIG_FILE))
}

/// Server container settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Container name used for `docker ps -f name=...` and `docker exec`.
    pub name: String,

    /// Image the container is created from.
    pub image: String,

    /// Run docker through `sudo`.
    pub sudo: bool,

    /// UDP port published for the stream.
    pub port: u16,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CONTAINER_NAME.to_string(),
            image: DEFAULT_CONTAINER_IMAGE.to_string(),
            sudo: true,
            port: DEFAULT_STREAM_PORT,
        }
    }
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestriConfig {
    /// Game launched by the last `nestri run <GAME>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,

    /// Server container settings.
    pub container: ContainerConfig,
}

impl NestriConfig {
    /// Load the config from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path()?)
    }

    /// Load the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path()?)
    }

    /// Save the config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)?;

        debug!(path = %path.display(), "Saved config");
        Ok(())
    }
}
