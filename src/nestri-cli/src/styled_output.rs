//! Styled CLI output.
//!
//! Status messages go to stderr with a bracketed tag, coloured only when the
//! stream is a terminal and `NO_COLOR` is not set.

use std::io::{IsTerminal, Write};

/// Check if colors should be disabled based on NO_COLOR env var.
fn colors_disabled() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// Whether coloured output should be written to stdout (or stderr).
pub fn use_colors(stderr: bool) -> bool {
    if colors_disabled() {
        return false;
    }
    if stderr {
        std::io::stderr().is_terminal()
    } else {
        std::io::stdout().is_terminal()
    }
}

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Foreground escape sequence for this colour.
    pub fn fg(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.0, self.1, self.2)
    }
}

pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";

/// Wrap `text` in a foreground colour.
pub fn colorize(color: Rgb, text: &str) -> String {
    format!("{}{}{}", color.fg(), text, RESET)
}

mod palette {
    use super::Rgb;

    pub const SUCCESS: Rgb = Rgb(0, 200, 150);
    pub const ERROR: Rgb = Rgb(240, 46, 64); // #F02E40
    pub const WARNING: Rgb = Rgb(255, 200, 87);
    pub const INFO: Rgb = Rgb(248, 72, 28); // #F8481C
}

/// Message type for styled output.
#[derive(Debug, Clone, Copy)]
pub enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

impl MessageType {
    fn tag(&self) -> &'static str {
        match self {
            MessageType::Success => "[OK]",
            MessageType::Error => "[ERROR]",
            MessageType::Warning => "[WARN]",
            MessageType::Info => "[INFO]",
        }
    }

    fn color(&self) -> Rgb {
        match self {
            MessageType::Success => palette::SUCCESS,
            MessageType::Error => palette::ERROR,
            MessageType::Warning => palette::WARNING,
            MessageType::Info => palette::INFO,
        }
    }
}

/// Format a message with its tag, optionally coloured.
pub fn format_message(msg_type: MessageType, message: &str, color: bool) -> String {
    if color {
        colorize(msg_type.color(), &format!("{} {}", msg_type.tag(), message))
    } else {
        format!("{} {}", msg_type.tag(), message)
    }
}

fn print_styled(msg_type: MessageType, message: &str) {
    let line = format_message(msg_type, message, use_colors(true));
    let _ = writeln!(std::io::stderr(), "{line}");
}

/// Print a success message to stderr.
pub fn print_success(message: &str) {
    print_styled(MessageType::Success, message);
}

/// Print an error message to stderr.
pub fn print_error(message: &str) {
    print_styled(MessageType::Error, message);
}

/// Print a warning message to stderr.
pub fn print_warning(message: &str) {
    print_styled(MessageType::Warning, message);
}

/// Print an info message to stderr.
pub fn print_info(message: &str) {
    print_styled(MessageType::Info, message);
}
