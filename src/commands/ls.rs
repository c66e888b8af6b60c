use jiff::Timestamp;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::view::TicketView;
use super::{TicketSource, print_json, truncate};
use crate::config::Config;
use crate::display::{format_badge, format_sla_bar, paint};
use crate::error::Result;
use crate::query::{Page, SortField, TicketPredicate, TicketQueryBuilder, paginate};

const TITLE_WIDTH: usize = 48;

/// Inputs of the ticket list view
#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    pub predicate: TicketPredicate,
    pub page: usize,
    pub page_size: Option<usize>,
    pub sort: Option<SortField>,
    pub json: bool,
}

/// A row in the ticket list table
#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "#")]
    number: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Queue")]
    queue: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "SLA")]
    sla: String,
}

impl TicketRow {
    fn from_view(view: &TicketView<'_>) -> Self {
        let ticket = view.ticket;
        Self {
            number: ticket.number,
            title: truncate(&ticket.title, TITLE_WIDTH),
            status: format_badge(&view.status_display),
            priority: format_badge(&view.priority_display),
            queue: match &view.queue_display {
                Some(queue) => paint(&queue.label, &queue.color),
                None => "-".to_string(),
            },
            owner: ticket
                .owner()
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "-".to_string()),
            sla: match &view.sla {
                Some(sla) => format!(
                    "{} {}",
                    format_sla_bar(&sla.progress, sla.band),
                    sla.remaining
                ),
                None => "-".to_string(),
            },
        }
    }
}

/// List tickets matching the filters, one page at a time
pub fn cmd_ls(
    source: &TicketSource,
    options: &LsOptions,
    config: &Config,
    now: Timestamp,
) -> Result<()> {
    let mut builder = TicketQueryBuilder::new().with_predicate(&options.predicate);
    if let Some(sort) = options.sort {
        builder = builder.with_sort(sort);
    }
    let matching = builder.build().apply(&source.tickets, now);

    let page_size = options.page_size.unwrap_or(config.page_size);
    let page: Page<TicketView> = paginate(matching, options.page, page_size)
        .map(|t| TicketView::new(t, &source.catalog, &config.sla, now));

    if options.json {
        return print_json(&page);
    }

    if page.items.is_empty() {
        println!("No tickets match the current filters.");
        return Ok(());
    }

    let rows: Vec<TicketRow> = page.items.iter().map(TicketRow::from_view).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    println!("\n{}", page_footer(&page));
    Ok(())
}

fn page_footer<T>(page: &Page<T>) -> String {
    let mut footer = format!(
        "Page {} of {} (showing {}-{} of {} tickets)",
        page.page,
        page.total_pages,
        page.first_item_number(),
        page.last_item_number(),
        page.total_items
    );
    if page.has_next {
        footer.push_str(&format!(" · next: --page {}", page.page + 1));
    }
    footer
}
