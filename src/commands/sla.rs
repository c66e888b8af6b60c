use jiff::Timestamp;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::view::TicketView;
use super::{TicketSource, print_json, truncate};
use crate::config::Config;
use crate::display::{format_badge, format_sla_bar};
use crate::error::Result;
use crate::query::{SortField, sort_tickets_by};
use crate::sla::SlaSummary;
use crate::types::Ticket;

#[derive(Serialize)]
struct SlaReport<'a> {
    summary: SlaSummary,
    at_risk: Vec<TicketView<'a>>,
}

#[derive(Tabled)]
struct AtRiskRow {
    #[tabled(rename = "#")]
    number: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "SLA")]
    sla: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

/// Active tickets with a tracked SLA, most at risk first
fn at_risk_tickets(tickets: &[Ticket], now: Timestamp, top: usize) -> Vec<&Ticket> {
    let mut tracked: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| !t.is_terminal() && t.created_at.is_some() && t.sla_deadline().is_some())
        .collect();
    sort_tickets_by(&mut tracked, SortField::Sla, now);
    tracked.truncate(top);
    tracked
}

/// Summarize SLA health across active tickets
pub fn cmd_sla(
    source: &TicketSource,
    top: usize,
    json: bool,
    config: &Config,
    now: Timestamp,
) -> Result<()> {
    let summary = SlaSummary::from_tickets(&source.tickets, now, &config.sla);
    let at_risk: Vec<TicketView> = at_risk_tickets(&source.tickets, now, top)
        .into_iter()
        .map(|t| TicketView::new(t, &source.catalog, &config.sla, now))
        .collect();

    if json {
        return print_json(&SlaReport { summary, at_risk });
    }

    print!("{}", render_summary(&summary));

    if at_risk.is_empty() {
        return Ok(());
    }

    println!(
        "\n{}",
        "Most at risk".if_supports_color(Stream::Stdout, |t| t.bold())
    );
    let rows: Vec<AtRiskRow> = at_risk
        .iter()
        .filter_map(|view| {
            let sla = view.sla.as_ref()?;
            Some(AtRiskRow {
                number: view.ticket.number,
                title: truncate(&view.ticket.title, 40),
                priority: format_badge(&view.priority_display),
                sla: format_sla_bar(&sla.progress, sla.band),
                remaining: sla.remaining.clone(),
            })
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    Ok(())
}

fn render_summary(summary: &SlaSummary) -> String {
    let mut out = format!(
        "{}\n\n",
        "SLA overview".if_supports_color(Stream::Stdout, |t| t.bold())
    );
    out.push_str(&format!(
        "Active tickets: {} ({} tracked, {} without SLA)\n",
        summary.active, summary.tracked, summary.untracked
    ));
    out.push_str(&format!(
        "Good: {}  Warning: {}  Critical: {}\n",
        summary.good, summary.warning, summary.critical
    ));
    out.push_str(&format!("Overdue: {}\n", summary.overdue));
    out.push_str(&format!("Compliance: {:.1}%\n", summary.compliance_rate));
    out
}
