//! CLI styling and formatting.
//!
//! Defines ANSI colors and formatting for the CLI help output.

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Nestri CLI styled help theme.
pub fn get_styles() -> Styles {
    Styles::styled()
        // Headers (USAGE, COMMANDS, OPTIONS)
        .header(AnsiColor::Red.on_default() | Effects::BOLD)
        .usage(AnsiColor::Red.on_default() | Effects::BOLD)
        // Command names, flag names
        .literal(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

/// After-help section with quick start, environment and paths.
pub const AFTER_HELP: &str = color_print::cstr!(
    r#"<red,bold>QUICK START</>
    <yellow,bold>nestri neofetch</>                Show system information
    <yellow,bold>nestri run</> <dim>~/game/Game.exe</>     Run a game and remember it
    <yellow,bold>nestri run</>                     Run the last game again
    <yellow,bold>nestri -vv run</>                 Run with debug logging

<red,bold>ENVIRONMENT VARIABLES</>
    <cyan>NESTRI_HOME</>          Override config directory (default: ~/.nestri)
    <cyan>NESTRI_LOG_LEVEL</>     Log verbosity (error, warn, info, debug, trace)
    <cyan>RUST_LOG</>             Full tracing filter, overrides everything else
    <cyan>NO_COLOR</>             Disable colored output (set to '1' or 'true')

<red,bold>PATHS</>
    <dim>Config</>      ~/.nestri/config.toml
    <dim>Games</>       ~/game/"#
);
