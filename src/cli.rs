use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;

use crate::query::SortField;
use crate::remote::parse_timestamp;

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "SLA monitoring and ticket lists for webhook-backed support desks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where tickets come from and which instant counts as "now"
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read tickets from a JSON export instead of the API
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Evaluate SLAs at this instant (RFC 3339 or 'YYYY-MM-DD HH:MM:SS' UTC; default: now)
    #[arg(long, value_parser = parse_now)]
    pub now: Option<Timestamp>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tickets with search, filters and pagination
    #[command(visible_alias = "l")]
    Ls {
        #[command(flatten)]
        source: SourceArgs,

        /// Case-insensitive text to look for in titles
        #[arg(short, long)]
        search: Option<String>,

        /// Also search descriptions, department and label names
        #[arg(long)]
        rich: bool,

        /// Status code to show, or 'all'
        #[arg(long, default_value = "all")]
        status: String,

        /// Priority code to show, or 'all'
        #[arg(long, default_value = "all")]
        priority: String,

        /// Page number (out-of-range values are clamped)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Tickets per page (default: from config, 10)
        #[arg(long)]
        page_size: Option<usize>,

        /// Sort by: number, created, priority, sla (default: input order)
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortField>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display one ticket with its SLA details
    #[command(visible_alias = "s")]
    Show {
        /// Ticket number
        number: u64,

        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize SLA health across active tickets
    Sla {
        #[command(flatten)]
        source: SourceArgs,

        /// How many at-risk tickets to list (default: 5)
        #[arg(long, default_value = "5")]
        top: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (token redacted)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the config file path
    Path,
}

fn parse_now(s: &str) -> Result<Timestamp, String> {
    parse_timestamp(s).map_err(|e| e.to_string())
}

fn parse_sort(s: &str) -> Result<SortField, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid sort field. Must be one of: {}",
            SortField::ALL_STRINGS.join(", ")
        )
    })
}
