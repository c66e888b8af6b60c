//! Backend-supplied status, priority and queue records, indexed for display lookups.

use std::collections::HashMap;

use super::{BadgeVariant, Color, ColorToken, DisplayInfo, resolve_priority, resolve_status};
use crate::macros::normalize_code;
use crate::types::{CatalogEntry, QueueRef, Ticket};

/// Status, priority and queue records fetched from the backend.
///
/// Records are looked up by id first, then by normalized name, so a ticket
/// carrying the code `in_progress` finds a record named "In Progress".
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    statuses: CatalogIndex,
    priorities: CatalogIndex,
    queues: CatalogIndex,
}

#[derive(Debug, Clone, Default)]
struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    by_key: HashMap<String, usize>,
}

impl CatalogIndex {
    fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut by_key = HashMap::new();
        // Ids win over names when both collide
        for (i, entry) in entries.iter().enumerate() {
            by_key.entry(normalize_code(&entry.name)).or_insert(i);
        }
        for (i, entry) in entries.iter().enumerate() {
            by_key.insert(normalize_code(&entry.id), i);
        }
        Self { entries, by_key }
    }

    fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.by_key
            .get(&normalize_code(key))
            .and_then(|&i| self.entries.get(i))
    }
}

impl Catalog {
    pub fn new(
        statuses: Vec<CatalogEntry>,
        priorities: Vec<CatalogEntry>,
        queues: Vec<CatalogEntry>,
    ) -> Self {
        Self {
            statuses: CatalogIndex::new(statuses),
            priorities: CatalogIndex::new(priorities),
            queues: CatalogIndex::new(queues),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.entries.is_empty()
            && self.priorities.entries.is_empty()
            && self.queues.entries.is_empty()
    }

    pub fn status(&self, code: &str) -> Option<&CatalogEntry> {
        self.statuses.get(code)
    }

    pub fn priority(&self, code: &str) -> Option<&CatalogEntry> {
        self.priorities.get(code)
    }

    pub fn queue(&self, id: &str) -> Option<&CatalogEntry> {
        self.queues.get(id)
    }

    /// Ticket's own record first, then the catalog, then the fixed table.
    pub fn status_display(&self, ticket: &Ticket) -> DisplayInfo {
        let entry = ticket
            .status_entry
            .as_ref()
            .or_else(|| self.status(&ticket.status.to_string()));
        resolve_status(&ticket.status, entry)
    }

    /// Ticket's own record first, then the catalog, then the fixed table.
    pub fn priority_display(&self, ticket: &Ticket) -> DisplayInfo {
        let entry = ticket
            .priority_entry
            .as_ref()
            .or_else(|| self.priority(&ticket.priority.to_string()));
        resolve_priority(&ticket.priority, entry)
    }

    pub fn queue_display(&self, queue: &QueueRef) -> DisplayInfo {
        let color = non_blank(queue.color.as_deref())
            .or_else(|| non_blank(self.queue(&queue.id).and_then(|e| e.color.as_deref())));
        DisplayInfo {
            label: queue.name.clone(),
            color: match color {
                Some(c) => Color::Custom(c),
                None => Color::Token(ColorToken::Gray),
            },
            badge: BadgeVariant::Outline,
        }
    }
}

fn non_blank(color: Option<&str>) -> Option<String> {
    color.filter(|c| !c.trim().is_empty()).map(str::to_string)
}
