#[macro_use]
pub mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod query;
pub mod remote;
pub mod sla;
pub mod types;

pub use config::Config;
pub use display::{Catalog, DisplayInfo, resolve_priority_display, resolve_status_display};
pub use error::{HelpdeskError, Result};
pub use query::{Page, SortField, TicketPredicate, filter_and_paginate, paginate};
pub use sla::{RiskBand, RiskThresholds, SlaProgress, SlaSummary, compute_sla_progress};
pub use types::{Ticket, TicketPriority, TicketStatus};
