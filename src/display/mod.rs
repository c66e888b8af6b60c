//! Label, color and badge resolution for statuses and priorities.
//!
//! Two sources feed the same contract: a fixed table keyed by the closed
//! code sets, and richer catalog records (name + color) sent by the backend.
//! When a catalog record is present it wins; the table is the fallback.

use std::fmt;

use serde::Serialize;

use crate::types::{CatalogEntry, Code, TicketPriority, TicketStatus};

mod catalog;
pub mod terminal;

pub use catalog::Catalog;
pub use terminal::{format_badge, format_risk_band, format_sla_bar, paint};

/// Named color from the design palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Gray,
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorToken::Blue => write!(f, "blue"),
            ColorToken::Green => write!(f, "green"),
            ColorToken::Yellow => write!(f, "yellow"),
            ColorToken::Orange => write!(f, "orange"),
            ColorToken::Red => write!(f, "red"),
            ColorToken::Gray => write!(f, "gray"),
        }
    }
}

impl ColorToken {
    /// Match a color name such as `"Red"` or `"grey"` to a token.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "blue" => Some(ColorToken::Blue),
            "green" => Some(ColorToken::Green),
            "yellow" => Some(ColorToken::Yellow),
            "orange" => Some(ColorToken::Orange),
            "red" => Some(ColorToken::Red),
            "gray" | "grey" => Some(ColorToken::Gray),
            _ => None,
        }
    }
}

/// A resolved color: either a palette token or a backend-supplied value
/// (usually `#rrggbb`) passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Color {
    Token(ColorToken),
    Custom(String),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Token(token) => token.fmt(f),
            Color::Custom(value) => f.write_str(value),
        }
    }
}

/// Badge style used when rendering a status or priority chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    #[default]
    Default,
    Secondary,
    Outline,
    Destructive,
}

/// Everything needed to render a status or priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayInfo {
    pub label: String,
    pub color: Color,
    pub badge: BadgeVariant,
}

impl DisplayInfo {
    fn new(label: &str, color: ColorToken, badge: BadgeVariant) -> Self {
        Self {
            label: label.to_string(),
            color: Color::Token(color),
            badge,
        }
    }

    /// Neutral rendering for codes outside the known set.
    pub fn fallback(raw: &str) -> Self {
        Self {
            label: raw.to_string(),
            color: Color::Token(ColorToken::Gray),
            badge: BadgeVariant::Default,
        }
    }

    /// Overlay a catalog record: its name and color take precedence when non-empty.
    pub fn with_entry(mut self, entry: Option<&CatalogEntry>) -> Self {
        let Some(entry) = entry else {
            return self;
        };
        if !entry.name.trim().is_empty() {
            self.label = entry.name.clone();
        }
        if let Some(color) = entry.color.as_deref().map(str::trim)
            && !color.is_empty()
        {
            self.color = Color::Custom(color.to_string());
        }
        self
    }
}

pub fn status_table(status: TicketStatus) -> DisplayInfo {
    match status {
        TicketStatus::Open => DisplayInfo::new("Open", ColorToken::Blue, BadgeVariant::Default),
        TicketStatus::InProgress => {
            DisplayInfo::new("In Progress", ColorToken::Yellow, BadgeVariant::Secondary)
        }
        TicketStatus::Resolved => {
            DisplayInfo::new("Resolved", ColorToken::Green, BadgeVariant::Outline)
        }
        TicketStatus::Closed => DisplayInfo::new("Closed", ColorToken::Gray, BadgeVariant::Outline),
    }
}

pub fn priority_table(priority: TicketPriority) -> DisplayInfo {
    match priority {
        TicketPriority::Low => DisplayInfo::new("Low", ColorToken::Green, BadgeVariant::Outline),
        TicketPriority::Medium => {
            DisplayInfo::new("Medium", ColorToken::Yellow, BadgeVariant::Secondary)
        }
        TicketPriority::High => DisplayInfo::new("High", ColorToken::Orange, BadgeVariant::Default),
        TicketPriority::Critical => {
            DisplayInfo::new("Critical", ColorToken::Red, BadgeVariant::Destructive)
        }
    }
}

/// Resolve a raw status code through the fixed table. Never fails.
pub fn resolve_status_display(code: &str) -> DisplayInfo {
    match code.parse::<TicketStatus>() {
        Ok(status) => status_table(status),
        Err(_) => DisplayInfo::fallback(code),
    }
}

/// Resolve a raw priority code through the fixed table. Never fails.
pub fn resolve_priority_display(code: &str) -> DisplayInfo {
    match code.parse::<TicketPriority>() {
        Ok(priority) => priority_table(priority),
        Err(_) => DisplayInfo::fallback(code),
    }
}

/// Resolve a parsed status code, letting a catalog record take precedence.
pub fn resolve_status(code: &Code<TicketStatus>, entry: Option<&CatalogEntry>) -> DisplayInfo {
    let base = match code {
        Code::Known(status) => status_table(*status),
        Code::Unknown(raw) => DisplayInfo::fallback(raw),
    };
    base.with_entry(entry)
}

/// Resolve a parsed priority code, letting a catalog record take precedence.
pub fn resolve_priority(code: &Code<TicketPriority>, entry: Option<&CatalogEntry>) -> DisplayInfo {
    let base = match code {
        Code::Known(priority) => priority_table(*priority),
        Code::Unknown(raw) => DisplayInfo::fallback(raw),
    };
    base.with_entry(entry)
}
