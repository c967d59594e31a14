//! CLI wiring: root command, logging and outcome reporting.
//!
//! # Module Structure
//!
//! - `app` - Root command and built-in registry
//! - `handlers` - Dispatch outcome reporting
//! - `logging` - Tracing subscriber setup
//! - `styles` - ANSI styling for help output

pub mod app;
pub mod handlers;
pub mod logging;
pub mod styles;

pub use app::{
    BIN_NAME, build_dispatcher, build_dispatcher_with, builtin_commands, long_version, root_command,
};
pub use handlers::{help_hint, not_found_message, report_outcome};
pub use logging::{LogLevel, init_logging};
pub use styles::{AFTER_HELP, get_styles};
