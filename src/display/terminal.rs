//! Terminal rendering of resolved display values.
//!
//! Colors are only emitted when stdout supports them, so piped output and
//! test captures stay plain.

use owo_colors::{OwoColorize, Stream};

use super::{Color, ColorToken, DisplayInfo};
use crate::sla::{RiskBand, SlaProgress};

const SLA_BAR_WIDTH: usize = 10;

/// Paint `text` in `color` if stdout supports color.
pub fn paint(text: &str, color: &Color) -> String {
    match color {
        Color::Token(token) => paint_token(text, *token),
        Color::Custom(value) => {
            if let Some((r, g, b)) = parse_hex_color(value) {
                text.if_supports_color(Stream::Stdout, |t| t.truecolor(r, g, b))
                    .to_string()
            } else if let Some(token) = ColorToken::from_name(value) {
                paint_token(text, token)
            } else {
                text.to_string()
            }
        }
    }
}

fn paint_token(text: &str, token: ColorToken) -> String {
    match token {
        ColorToken::Blue => text.if_supports_color(Stream::Stdout, |t| t.blue()).to_string(),
        ColorToken::Green => text.if_supports_color(Stream::Stdout, |t| t.green()).to_string(),
        ColorToken::Yellow => text.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
        ColorToken::Orange => text
            .if_supports_color(Stream::Stdout, |t| t.truecolor(249, 115, 22))
            .to_string(),
        ColorToken::Red => text.if_supports_color(Stream::Stdout, |t| t.red()).to_string(),
        ColorToken::Gray => text.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string(),
    }
}

/// Parse `#rrggbb` or `#rgb`.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some((
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let expand = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).ok();
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// Render a status or priority chip, e.g. `[In Progress]`.
pub fn format_badge(info: &DisplayInfo) -> String {
    paint(&format!("[{}]", info.label), &info.color)
}

pub fn format_risk_band(band: RiskBand) -> String {
    paint(&band.to_string(), &Color::Token(band.color()))
}

/// Render SLA progress as a fixed-width bar with the percentage,
/// e.g. `███████░░░  75%`, suffixed with `OVERDUE` on breach.
pub fn format_sla_bar(progress: &SlaProgress, band: RiskBand) -> String {
    let filled = ((progress.percent / 100.0) * SLA_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(SLA_BAR_WIDTH);
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(SLA_BAR_WIDTH - filled)
    );
    let mut out = format!(
        "{} {:>3.0}%",
        paint(&bar, &Color::Token(band.color())),
        progress.percent
    );
    if progress.is_overdue {
        out.push(' ');
        out.push_str(&paint("OVERDUE", &Color::Token(ColorToken::Red)));
    }
    out
}
