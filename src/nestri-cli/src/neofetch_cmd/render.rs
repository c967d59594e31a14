//! Side-by-side rendering of the logo and the host facts.

use crate::styled_output::{BOLD, RESET, Rgb, colorize};

use super::specs::SystemSpecs;

/// Logo printed on the left.
pub const LOGO: &str = include_str!("nestri.ascii");

/// Top-to-bottom logo gradient.
const GRADIENT: [Rgb; 5] = [
    Rgb(0xF8, 0x48, 0x1C),
    Rgb(0xF7, 0x41, 0x27),
    Rgb(0xF5, 0x3B, 0x30),
    Rgb(0xF2, 0x35, 0x38),
    Rgb(0xF0, 0x2E, 0x40),
];

const MARGIN: &str = "    ";

/// Gradient colour for logo line `index` out of `total` lines.
fn gradient_color(index: usize, total: usize) -> Rgb {
    let step = (total / GRADIENT.len()).max(1);
    GRADIENT[(index / step).min(GRADIENT.len() - 1)]
}

/// Lines of the info panel, before any padding.
fn panel_lines(specs: &SystemSpecs, color: bool) -> Vec<String> {
    let title = specs.user_host.as_deref().unwrap_or("unknown");
    let mut lines = Vec::with_capacity(11);

    if color {
        lines.push(format!("{BOLD}{}{RESET}", colorize(GRADIENT[0], title)));
    } else {
        lines.push(title.to_string());
    }
    lines.push("-".repeat(title.chars().count()));

    for (label, value) in specs.rows() {
        if color {
            lines.push(format!(
                "{BOLD}{}{RESET}: {value}",
                colorize(GRADIENT[GRADIENT.len() - 1], label)
            ));
        } else {
            lines.push(format!("{label}: {value}"));
        }
    }
    lines
}

/// Render the full neofetch output.
///
/// Padding is computed from the uncoloured logo so escape codes never
/// shift the panel column.
pub fn render(specs: &SystemSpecs, color: bool) -> String {
    let art: Vec<&str> = LOGO.lines().collect();
    let width = art.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let panel = panel_lines(specs, color);
    let height = art.len().max(panel.len());

    let mut out = String::from("\n");
    for i in 0..height {
        let plain = art.get(i).copied().unwrap_or("");
        let pad = " ".repeat(width - plain.chars().count());
        let logo = if color && !plain.is_empty() {
            colorize(gradient_color(i, art.len()), plain)
        } else {
            plain.to_string()
        };

        let info = panel.get(i).map(String::as_str).unwrap_or("");
        let line = format!("{MARGIN}{logo}{pad}{MARGIN}{info}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push('\n');
    out
}
