//! Nestri CLI library module.
//!
//! Everything behind the `nestri` binary:
//! - Root command, built-in registry and outcome reporting
//! - Logging setup driven by `-v`, `RUST_LOG` and `NESTRI_LOG_LEVEL`
//! - `config.toml` in the nestri home directory
//! - The `neofetch` and `run` commands
//!
//! # Module Organization
//!
//! - `cli/` - Root command, logging and dispatch reporting
//! - `utils/` - Argument parsing and path helpers shared by commands
//! - Command modules - Individual CLI commands (`*_cmd/`)
//! - `styled_output` - Themed terminal output formatting
//! - `config` - Nestri home and persisted settings

pub mod cli;
pub mod config;
pub mod styled_output;
pub mod utils;

// Command modules
pub mod neofetch_cmd;
pub mod run_cmd;
