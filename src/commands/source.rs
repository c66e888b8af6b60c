use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::Config;
use crate::display::Catalog;
use crate::error::{HelpdeskError, Result};
use crate::remote::{WebhookClient, catalog_from_value, tickets_from_value};
use crate::types::Ticket;

/// Catalog sections an export file may carry next to its tickets.
const CATALOG_KEYS: [&str; 3] = ["statuses", "priorities", "queues"];

/// A fetched snapshot: tickets plus whatever catalog came with them.
#[derive(Debug, Clone, Default)]
pub struct TicketSource {
    pub tickets: Vec<Ticket>,
    pub catalog: Catalog,
}

/// Load tickets from an export file if given, otherwise from the API.
pub async fn load_source(file: Option<&Path>, config: &Config) -> Result<TicketSource> {
    match file {
        Some(path) => load_file(path),
        None => {
            let client = WebhookClient::from_config(config)?;
            let (tickets, catalog) = tokio::join!(client.fetch_tickets(), client.fetch_catalog());
            Ok(TicketSource {
                tickets: tickets?,
                catalog,
            })
        }
    }
}

fn load_file(path: &Path) -> Result<TicketSource> {
    let content = fs::read_to_string(path).map_err(|e| {
        HelpdeskError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read tickets from {}: {}", path.display(), e),
        ))
    })?;
    source_from_value(serde_json::from_str(&content)?)
}

/// Split an export payload into tickets and the optional
/// `statuses` / `priorities` / `queues` catalog sections.
pub fn source_from_value(mut value: Value) -> Result<TicketSource> {
    let mut sections: [Vec<_>; 3] = Default::default();
    if let Value::Object(map) = &mut value {
        for (slot, key) in sections.iter_mut().zip(CATALOG_KEYS) {
            if let Some(section) = map.remove(key) {
                *slot = catalog_from_value(section)?;
            }
        }
    }

    let tickets = tickets_from_value(value)?;
    let [statuses, priorities, queues] = sections;
    Ok(TicketSource {
        tickets,
        catalog: Catalog::new(statuses, priorities, queues),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_array() {
        let source = source_from_value(json!([{"id": 1, "title": "a"}])).unwrap();
        assert_eq!(source.tickets.len(), 1);
        assert!(source.catalog.is_empty());
    }

    #[test]
    fn test_export_with_catalogs() {
        let source = source_from_value(json!({
            "tickets": [{"id": 1, "title": "a", "status": "open"}],
            "statuses": [{"id": "open", "name": "Neu", "color": "#00f"}],
            "queues": [{"id": 2, "name": "Tier 2", "is_active": 0}]
        }))
        .unwrap();
        assert_eq!(source.tickets.len(), 1);
        assert_eq!(source.catalog.status("open").map(|e| e.name.as_str()), Some("Neu"));
        assert!(source.catalog.queue("2").is_none());
        assert_eq!(
            source.catalog.status_display(&source.tickets[0]).label,
            "Neu"
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read tickets"));
    }
}
