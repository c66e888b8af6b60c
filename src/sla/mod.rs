//! SLA progress computation and risk banding.
//!
//! Everything here is a pure function of its inputs. The current time is
//! always passed in by the caller so results are deterministic.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::display::ColorToken;
use crate::types::Ticket;

mod summary;

pub use summary::SlaSummary;

/// Elapsed share of an SLA window plus the overdue flag.
///
/// `percent` saturates at 100, so `is_overdue` is the only reliable breach signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlaProgress {
    pub percent: f64,
    pub is_overdue: bool,
}

impl SlaProgress {
    pub const UNTRACKED: SlaProgress = SlaProgress {
        percent: 0.0,
        is_overdue: false,
    };
}

/// Compute how much of the SLA window between `created_at` and `deadline`
/// has elapsed at `now`.
pub fn compute_sla_progress(
    created_at: Timestamp,
    deadline: Option<Timestamp>,
    now: Timestamp,
) -> SlaProgress {
    let Some(deadline) = deadline else {
        return SlaProgress::UNTRACKED;
    };
    let is_overdue = now > deadline;

    let total = deadline.duration_since(created_at);
    if total <= SignedDuration::ZERO {
        return SlaProgress {
            percent: 100.0,
            is_overdue,
        };
    }

    let elapsed = now.duration_since(created_at);
    let ratio = elapsed.as_secs_f64() / total.as_secs_f64() * 100.0;
    let percent = if ratio.is_finite() {
        ratio.clamp(0.0, 100.0)
    } else {
        0.0
    };

    SlaProgress {
        percent,
        is_overdue,
    }
}

/// SLA progress for a ticket, using its effective deadline.
///
/// A ticket without a creation time has no measurable progress.
pub fn ticket_sla_progress(ticket: &Ticket, now: Timestamp) -> SlaProgress {
    match ticket.created_at {
        Some(created_at) => compute_sla_progress(created_at, ticket.sla_deadline(), now),
        None => SlaProgress::UNTRACKED,
    }
}

/// Coarse classification of how close a ticket is to breaching its SLA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Good,
    Warning,
    Critical,
}

impl RiskBand {
    pub fn color(self) -> ColorToken {
        match self {
            RiskBand::Good => ColorToken::Green,
            RiskBand::Warning => ColorToken::Yellow,
            RiskBand::Critical => ColorToken::Red,
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Good => write!(f, "good"),
            RiskBand::Warning => write!(f, "warning"),
            RiskBand::Critical => write!(f, "critical"),
        }
    }
}

/// Percent cutoffs for the warning and critical bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,
}

fn default_warning_threshold() -> f64 {
    70.0
}

fn default_critical_threshold() -> f64 {
    90.0
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            warning_threshold: default_warning_threshold(),
            critical_threshold: default_critical_threshold(),
        }
    }
}

impl RiskThresholds {
    /// Check if these are the default cutoffs (for serialization skip)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Thresholds must satisfy `0 < warning < critical <= 100`.
    pub fn is_valid(&self) -> bool {
        self.warning_threshold > 0.0
            && self.warning_threshold < self.critical_threshold
            && self.critical_threshold <= 100.0
    }

    pub fn band(&self, percent: f64) -> RiskBand {
        if percent >= self.critical_threshold {
            RiskBand::Critical
        } else if percent >= self.warning_threshold {
            RiskBand::Warning
        } else {
            RiskBand::Good
        }
    }
}

/// Band a percentage using the default 70/90 policy.
pub fn risk_band(percent: f64) -> RiskBand {
    RiskThresholds::default().band(percent)
}

/// Signed time left until `deadline`; negative once the deadline has passed.
pub fn sla_remaining(deadline: Timestamp, now: Timestamp) -> SignedDuration {
    deadline.duration_since(now)
}

/// Human-readable remaining time, e.g. `2h 15m left` or `overdue by 45m`.
pub fn format_remaining(remaining: SignedDuration) -> String {
    let secs = remaining.as_secs();
    if secs < 0 {
        format!("overdue by {}", format_span(secs.unsigned_abs()))
    } else {
        format!("{} left", format_span(secs.unsigned_abs()))
    }
}

fn format_span(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        "<1m".to_string()
    }
}
