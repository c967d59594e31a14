//! Logging setup for command invocations.
//!
//! The filter is resolved in order: `RUST_LOG`, then the `-v` count, then
//! `NESTRI_LOG_LEVEL`, then `warn`.

use std::io::IsTerminal;

use nestri_commands::GlobalContext;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting a log level by name.
pub const NESTRI_LOG_LEVEL_ENV: &str = "NESTRI_LOG_LEVEL";

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Level selected by `n` occurrences of `-v`.
    pub fn from_verbosity(n: u8) -> LogLevel {
        match n {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Resolve the tracing filter directive.
pub fn resolve_filter(
    ctx: &GlobalContext,
    rust_log: Option<&str>,
    env_level: Option<&str>,
) -> String {
    if let Some(filter) = rust_log.filter(|f| !f.trim().is_empty()) {
        return filter.to_string();
    }

    let level = if ctx.is_verbose() {
        LogLevel::from_verbosity(ctx.verbosity_level())
    } else {
        env_level
            .and_then(LogLevel::from_str_loose)
            .unwrap_or_default()
    };

    level.as_filter_str().to_string()
}

/// Install the global tracing subscriber, writing to stderr.
///
/// Only the first call takes effect.
pub fn init_logging(ctx: &GlobalContext) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_level = std::env::var(NESTRI_LOG_LEVEL_ENV).ok();
    let filter = resolve_filter(ctx, rust_log.as_deref(), env_level.as_deref());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
