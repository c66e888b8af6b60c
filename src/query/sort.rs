//! Sort functions for ticket lists.

use std::borrow::Borrow;
use std::cmp::Ordering;

use jiff::Timestamp;

use crate::enum_display_fromstr;
use crate::error::HelpdeskError;
use crate::sla::ticket_sla_progress;
use crate::types::Ticket;

/// Sort field for ticket listing and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Highest number (newest) first
    #[default]
    Number,
    /// Newest creation time first
    Created,
    /// Most urgent priority first
    Priority,
    /// Most at-risk SLA first
    Sla,
}

impl SortField {
    /// All valid string representations of this enum.
    pub const ALL_STRINGS: &[&str] = &["number", "created", "priority", "sla"];
}

enum_display_fromstr!(
    SortField,
    HelpdeskError::invalid_sort_field,
    {
        Number => "number",
        Created => "created",
        Priority => "priority",
        Sla => "sla",
    }
);

fn as_ticket<T: Borrow<Ticket>>(t: &T) -> &Ticket {
    t.borrow()
}

fn by_number_desc(a: &Ticket, b: &Ticket) -> Ordering {
    b.number.cmp(&a.number)
}

/// Sort tickets by number, newest first
pub fn sort_by_number<T: Borrow<Ticket>>(tickets: &mut [T]) {
    tickets.sort_by(|a, b| by_number_desc(as_ticket(a), as_ticket(b)));
}

/// Sort tickets by creation date (newest first); undated tickets go last
pub fn sort_by_created<T: Borrow<Ticket>>(tickets: &mut [T]) {
    tickets.sort_by(|a, b| {
        let (a, b) = (as_ticket(a), as_ticket(b));
        match (&a.created_at, &b.created_at) {
            (Some(date_a), Some(date_b)) => date_b.cmp(date_a).then_with(|| by_number_desc(a, b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => by_number_desc(a, b),
        }
    });
}

/// Sort tickets by priority (critical first); unknown priorities go last
pub fn sort_by_priority<T: Borrow<Ticket>>(tickets: &mut [T]) {
    tickets.sort_by(|a, b| {
        let (a, b) = (as_ticket(a), as_ticket(b));
        let wa = a.priority.known().map(|p| p.weight()).unwrap_or(0);
        let wb = b.priority.known().map(|p| p.weight()).unwrap_or(0);
        wb.cmp(&wa).then_with(|| by_number_desc(a, b))
    });
}

/// Sort tickets by SLA risk at `now`: overdue first, then by elapsed
/// percentage descending; tickets without an SLA go last.
pub fn sort_by_sla<T: Borrow<Ticket>>(tickets: &mut [T], now: Timestamp) {
    tickets.sort_by_cached_key(|t| {
        let ticket = as_ticket(t);
        let tracked = ticket.created_at.is_some() && ticket.sla_deadline().is_some();
        let progress = ticket_sla_progress(ticket, now);
        let tier: u8 = match (tracked, progress.is_overdue) {
            (true, true) => 0,
            (true, false) => 1,
            (false, _) => 2,
        };
        // Hundredths of a percent, inverted so larger progress sorts first
        let inverted = 10_000 - (progress.percent * 100.0).round() as i64;
        (tier, inverted, ticket.sla_deadline(), ticket.number)
    });
}

/// Sort tickets by the specified field
pub fn sort_tickets_by<T: Borrow<Ticket>>(tickets: &mut [T], sort_by: SortField, now: Timestamp) {
    match sort_by {
        SortField::Number => sort_by_number(tickets),
        SortField::Created => sort_by_created(tickets),
        SortField::Priority => sort_by_priority(tickets),
        SortField::Sla => sort_by_sla(tickets, now),
    }
}
