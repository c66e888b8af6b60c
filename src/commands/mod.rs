mod config;
mod ls;
mod show;
mod sla;
mod source;
pub mod view;

pub use config::{cmd_config_path, cmd_config_show};
pub use ls::{LsOptions, cmd_ls};
pub use show::cmd_show;
pub use sla::cmd_sla;
pub use source::{TicketSource, load_source};
pub use view::{SlaView, TicketView};

use jiff::Timestamp;
use serde::Serialize;

use crate::error::Result;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The instant SLAs are evaluated at. The wall clock is read here, once,
/// and never inside the core.
pub fn resolve_now(now: Option<Timestamp>) -> Timestamp {
    now.unwrap_or_else(Timestamp::now)
}

/// Truncate to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let cut: String = text.chars().take(keep).collect();
    format!("{cut}...")
}
