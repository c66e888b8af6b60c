//! Derived per-ticket display values shared by the list, detail and SLA commands.

use jiff::Timestamp;
use serde::Serialize;

use crate::display::{Catalog, DisplayInfo};
use crate::sla::{
    RiskBand, RiskThresholds, SlaProgress, format_remaining, sla_remaining, ticket_sla_progress,
};
use crate::types::Ticket;

/// SLA values for a ticket that has a deadline.
#[derive(Debug, Clone, Serialize)]
pub struct SlaView {
    pub deadline: Timestamp,
    #[serde(flatten)]
    pub progress: SlaProgress,
    pub band: RiskBand,
    pub remaining: String,
}

/// A ticket together with everything a view renders for it.
#[derive(Debug, Clone, Serialize)]
pub struct TicketView<'a> {
    #[serde(flatten)]
    pub ticket: &'a Ticket,
    pub status_display: DisplayInfo,
    pub priority_display: DisplayInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_display: Option<DisplayInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla: Option<SlaView>,
}

impl<'a> TicketView<'a> {
    pub fn new(
        ticket: &'a Ticket,
        catalog: &Catalog,
        thresholds: &RiskThresholds,
        now: Timestamp,
    ) -> Self {
        let sla = match (ticket.created_at, ticket.sla_deadline()) {
            (Some(_), Some(deadline)) => {
                let progress = ticket_sla_progress(ticket, now);
                Some(SlaView {
                    deadline,
                    progress,
                    band: thresholds.band(progress.percent),
                    remaining: format_remaining(sla_remaining(deadline, now)),
                })
            }
            _ => None,
        };

        Self {
            ticket,
            status_display: catalog.status_display(ticket),
            priority_display: catalog.priority_display(ticket),
            queue_display: ticket.queue.as_ref().map(|q| catalog.queue_display(q)),
            sla,
        }
    }
}
