//! Builders for ticket export payloads in the backend's wire format.

use serde_json::{Value, json};

/// Fixed evaluation instant used across the CLI tests
pub const NOW: &str = "2024-05-06T12:00:00Z";

/// Creation time three hours before [`NOW`]
pub const CREATED: &str = "2024-05-06 09:00:00";

/// Builder for one ticket record
pub struct TicketBuilder {
    record: Value,
}

impl TicketBuilder {
    pub fn new(number: u64) -> Self {
        Self {
            record: json!({
                "id": format!("t-{number}"),
                "number": number,
                "title": format!("Ticket {number}"),
                "status": "open",
                "priority": "medium",
                "created_at": CREATED,
            }),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record["title"] = json!(title);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.record["description"] = json!(description);
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.record["status"] = json!(status);
        self
    }

    pub fn priority(mut self, priority: &str) -> Self {
        self.record["priority"] = json!(priority);
        self
    }

    /// Give the ticket a request type with an SLA budget in minutes
    pub fn sla_minutes(mut self, minutes: u32) -> Self {
        self.record["request_type"] = json!({"id": 1, "name": "Incident", "sla": minutes});
        self
    }

    pub fn assignee(mut self, name: &str) -> Self {
        self.record["assignee"] = json!({"id": 9, "name": name});
        self
    }

    pub fn queue(mut self, id: u64, name: &str) -> Self {
        self.record["queue"] = json!({"id": id, "name": name});
        self
    }

    pub fn build(self) -> Value {
        self.record
    }
}

/// `count` plain tickets numbered from 1
pub fn numbered_tickets(count: u64) -> Value {
    Value::Array((1..=count).map(|n| TicketBuilder::new(n).build()).collect())
}
