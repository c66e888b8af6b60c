use jiff::Timestamp;
use serde::Serialize;

use super::{RiskBand, RiskThresholds, ticket_sla_progress};
use crate::types::Ticket;

/// Aggregate SLA counts for the dashboard widgets.
///
/// Only active tickets (not resolved or closed) are considered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlaSummary {
    pub active: usize,
    pub tracked: usize,
    pub untracked: usize,
    pub good: usize,
    pub warning: usize,
    pub critical: usize,
    pub overdue: usize,
    /// Share of tracked tickets not yet overdue, in percent.
    pub compliance_rate: f64,
}

impl SlaSummary {
    pub fn from_tickets(tickets: &[Ticket], now: Timestamp, thresholds: &RiskThresholds) -> Self {
        let mut summary = SlaSummary::default();

        for ticket in tickets.iter().filter(|t| !t.is_terminal()) {
            summary.active += 1;

            if ticket.created_at.is_none() || ticket.sla_deadline().is_none() {
                summary.untracked += 1;
                continue;
            }

            summary.tracked += 1;
            let progress = ticket_sla_progress(ticket, now);
            if progress.is_overdue {
                summary.overdue += 1;
            }
            match thresholds.band(progress.percent) {
                RiskBand::Good => summary.good += 1,
                RiskBand::Warning => summary.warning += 1,
                RiskBand::Critical => summary.critical += 1,
            }
        }

        summary.compliance_rate = if summary.tracked == 0 {
            100.0
        } else {
            (summary.tracked - summary.overdue) as f64 / summary.tracked as f64 * 100.0
        };

        summary
    }
}
