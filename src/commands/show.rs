use jiff::Timestamp;
use owo_colors::{OwoColorize, Stream};

use super::view::TicketView;
use super::{TicketSource, print_json};
use crate::config::Config;
use crate::display::{format_badge, format_risk_band, format_sla_bar, paint};
use crate::error::{HelpdeskError, Result};
use crate::types::Ticket;

/// Display one ticket with its SLA details
pub fn cmd_show(
    source: &TicketSource,
    number: u64,
    json: bool,
    config: &Config,
    now: Timestamp,
) -> Result<()> {
    let ticket = source
        .tickets
        .iter()
        .find(|t| t.number == number)
        .ok_or(HelpdeskError::TicketNotFound(number))?;
    let view = TicketView::new(ticket, &source.catalog, &config.sla, now);

    if json {
        return print_json(&view);
    }

    print!("{}", render_details(&view));
    Ok(())
}

fn heading(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.bold()).to_string()
}

fn field(out: &mut String, name: &str, value: &str) {
    let name = format!("{name}:");
    out.push_str(&format!(
        "{:<14}{}\n",
        name.if_supports_color(Stream::Stdout, |t| t.cyan()),
        value
    ));
}

fn render_details(view: &TicketView<'_>) -> String {
    let ticket: &Ticket = view.ticket;
    let mut out = format!("{}\n\n", heading(&format!("#{} {}", ticket.number, ticket.title)));

    field(&mut out, "Status", &format_badge(&view.status_display));
    field(&mut out, "Priority", &format_badge(&view.priority_display));
    if let Some(queue) = &view.queue_display {
        field(&mut out, "Queue", &paint(&queue.label, &queue.color));
    }
    if let Some(department) = ticket.department_name() {
        field(&mut out, "Department", department);
    }
    if let Some(owner) = ticket.owner() {
        let value = match &owner.email {
            Some(email) => format!("{} <{}>", owner.name, email),
            None => owner.name.clone(),
        };
        field(&mut out, "Owner", &value);
    }
    if let Some(request_type) = &ticket.request_type {
        let value = match request_type.sla.filter(|m| *m > 0) {
            Some(minutes) => format!("{} (SLA {} min)", request_type.name, minutes),
            None => request_type.name.clone(),
        };
        field(&mut out, "Request type", &value);
    }
    if !ticket.labels.is_empty() {
        let labels: Vec<&str> = ticket.labels.iter().map(|l| l.name.as_str()).collect();
        field(&mut out, "Labels", &labels.join(", "));
    }
    if let Some(created) = ticket.created_at {
        field(&mut out, "Created", &created.to_string());
    }

    match &view.sla {
        Some(sla) => {
            field(&mut out, "Deadline", &sla.deadline.to_string());
            field(
                &mut out,
                "SLA",
                &format!("{} {}", format_sla_bar(&sla.progress, sla.band), sla.remaining),
            );
            field(&mut out, "Risk", &format_risk_band(sla.band));
        }
        None => field(&mut out, "SLA", "not tracked"),
    }

    if let Some(description) = ticket.description.as_deref().map(str::trim)
        && !description.is_empty()
    {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }

    out
}
