//! Boundary conversion from the backend's webhook payloads to canonical types.
//!
//! The webhook API is loosely typed: ids arrive as numbers or strings, flags
//! as `1`/`0`, timestamps with or without offsets, and statuses either as a
//! bare code or as a catalog record. Everything is normalized here so the
//! rest of the crate only sees [`Ticket`] and [`CatalogEntry`].
//!
//! Records that cannot be normalized are skipped with a warning rather than
//! failing the whole payload.

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{HelpdeskError, Result};
use crate::types::{
    CatalogEntry, Code, DepartmentRef, LabelRef, QueueRef, RequestType, Ticket, UserRef,
};

/// Keys that may wrap the record array in an object payload.
const ENVELOPE_KEYS: &[&str] = &["data", "tickets", "items", "results"];

/// Epoch values above this are taken to be milliseconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlexString {
    Text(String),
    Int(i64),
    Float(f64),
}

impl FlexString {
    fn into_string(self) -> String {
        match self {
            FlexString::Text(s) => s.trim().to_string(),
            FlexString::Int(n) => n.to_string(),
            FlexString::Float(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlexNumber {
    Int(u64),
    Text(String),
}

impl FlexNumber {
    fn value(&self) -> Option<u64> {
        match self {
            FlexNumber::Int(n) => Some(*n),
            FlexNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlexBool {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FlexBool {
    fn value(&self) -> bool {
        match self {
            FlexBool::Bool(b) => *b,
            FlexBool::Int(n) => *n != 0,
            FlexBool::Text(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "on"
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlexTimestamp {
    Text(String),
    Epoch(i64),
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A status, priority or queue record as sent by the catalog endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
struct WireRecord {
    #[serde(default)]
    id: Option<FlexString>,
    #[serde(default, alias = "slug", alias = "key")]
    code: Option<String>,
    #[serde(default, alias = "label", alias = "title")]
    name: Option<String>,
    #[serde(default, alias = "colour", alias = "hex")]
    color: Option<String>,
    #[serde(default, alias = "isActive", alias = "active")]
    is_active: Option<FlexBool>,
}

impl WireRecord {
    fn is_active(&self) -> bool {
        self.is_active.as_ref().is_none_or(FlexBool::value)
    }

    fn id_string(&self) -> Option<String> {
        self.id
            .clone()
            .map(FlexString::into_string)
            .filter(|s| !s.is_empty())
    }

    fn into_entry(self) -> Option<CatalogEntry> {
        let id = self
            .id_string()
            .or_else(|| self.code.clone())
            .or_else(|| self.name.clone())?;
        let name = self.name.clone().unwrap_or_else(|| id.clone());
        Some(CatalogEntry {
            id,
            name,
            color: self.color.filter(|c| !c.trim().is_empty()),
        })
    }
}

/// A status or priority field: either a bare code or a full record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WireCoded {
    Code(FlexString),
    Record(WireRecord),
}

impl WireCoded {
    /// The raw code plus the record, if one was sent.
    fn split(self) -> (Option<String>, Option<CatalogEntry>) {
        match self {
            WireCoded::Code(code) => (Some(code.into_string()), None),
            WireCoded::Record(record) => {
                let code = record
                    .code
                    .clone()
                    .or_else(|| record.name.clone())
                    .or_else(|| record.id_string());
                (code, record.into_entry())
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WireUser {
    #[serde(default, alias = "user_id", alias = "userId")]
    id: Option<FlexString>,
    #[serde(default, alias = "full_name", alias = "fullName", alias = "username")]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl WireUser {
    fn into_ref(self) -> Option<UserRef> {
        let id = self.id.map(FlexString::into_string)?;
        let email = self.email.filter(|e| !e.trim().is_empty());
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| email.clone())
            .unwrap_or_else(|| id.clone());
        Some(UserRef { id, name, email })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WireRequestType {
    #[serde(default)]
    id: Option<FlexString>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "sla_minutes", alias = "slaMinutes")]
    sla: Option<FlexNumber>,
}

impl WireRequestType {
    fn into_request_type(self) -> RequestType {
        RequestType {
            id: self.id.map(FlexString::into_string),
            name: self.name.unwrap_or_default(),
            sla: self
                .sla
                .and_then(|s| s.value())
                .and_then(|m| u32::try_from(m).ok()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WireTicket {
    #[serde(default)]
    id: Option<FlexString>,
    #[serde(default, alias = "ticket_number", alias = "ticketNumber")]
    number: Option<FlexNumber>,
    #[serde(default, alias = "subject")]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<WireCoded>,
    #[serde(default)]
    priority: Option<WireCoded>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<FlexTimestamp>,
    #[serde(default, alias = "slaDeadline")]
    sla_deadline: Option<FlexTimestamp>,
    #[serde(default, alias = "requestType")]
    request_type: Option<WireRequestType>,
    #[serde(default, alias = "responsibleUser")]
    responsible_user: Option<WireUser>,
    #[serde(default, alias = "assigned_to", alias = "assignedTo")]
    assignee: Option<WireUser>,
    #[serde(default)]
    department: Option<WireRecord>,
    #[serde(default, alias = "tags", deserialize_with = "null_as_default")]
    labels: Vec<WireRecord>,
    #[serde(default)]
    queue: Option<WireRecord>,
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 with an offset, or a civil date-time / date without one,
/// which is interpreted as UTC (`2024-05-06 09:00:00`, `2024-05-06T09:00:00`,
/// `2024-05-06`).
pub fn parse_timestamp(raw: &str) -> Result<Timestamp> {
    let trimmed = raw.trim();
    if let Ok(ts) = trimmed.parse::<Timestamp>() {
        return Ok(ts);
    }

    let invalid = || HelpdeskError::InvalidTimestamp(raw.to_string());
    let civil = trimmed.replacen(' ', "T", 1);
    let datetime = match civil.parse::<DateTime>() {
        Ok(dt) => dt,
        Err(_) => civil
            .parse::<Date>()
            .map_err(|_| invalid())?
            .to_datetime(jiff::civil::Time::midnight()),
    };
    datetime
        .to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|_| invalid())
}

fn epoch_to_timestamp(value: i64) -> Option<Timestamp> {
    if value.unsigned_abs() >= EPOCH_MILLIS_CUTOFF.unsigned_abs() {
        Timestamp::from_millisecond(value).ok()
    } else {
        Timestamp::from_second(value).ok()
    }
}

fn convert_timestamp(
    field: &str,
    ticket_id: &str,
    value: Option<FlexTimestamp>,
) -> Option<Timestamp> {
    match value? {
        FlexTimestamp::Epoch(n) => {
            let ts = epoch_to_timestamp(n);
            if ts.is_none() {
                tracing::warn!("ticket {ticket_id}: {field} epoch {n} out of range, ignoring");
            }
            ts
        }
        FlexTimestamp::Text(s) if s.trim().is_empty() => None,
        FlexTimestamp::Text(s) => match parse_timestamp(&s) {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::warn!("ticket {ticket_id}: {field}: {e}, ignoring");
                None
            }
        },
    }
}

fn active_records(records: Vec<WireRecord>) -> impl Iterator<Item = CatalogEntry> {
    records
        .into_iter()
        .filter(WireRecord::is_active)
        .filter_map(WireRecord::into_entry)
}

impl WireTicket {
    fn into_ticket(self) -> std::result::Result<Ticket, String> {
        let id = self
            .id
            .map(FlexString::into_string)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "missing id".to_string())?;
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| format!("ticket {id}: missing title"))?;
        let number = self
            .number
            .as_ref()
            .and_then(FlexNumber::value)
            .or_else(|| id.parse().ok())
            .ok_or_else(|| format!("ticket {id}: missing number"))?;

        let (status_code, status_entry) = self.status.map(WireCoded::split).unwrap_or_default();
        let (priority_code, priority_entry) =
            self.priority.map(WireCoded::split).unwrap_or_default();

        let status = status_code
            .filter(|c| !c.trim().is_empty())
            .map(|c| Code::canonical(&c))
            .unwrap_or_default();
        let priority = priority_code
            .filter(|c| !c.trim().is_empty())
            .map(|c| Code::canonical(&c))
            .unwrap_or_default();

        let created_at = convert_timestamp("created_at", &id, self.created_at);
        let sla_deadline = convert_timestamp("sla_deadline", &id, self.sla_deadline);

        let department = self.department.and_then(WireRecord::into_entry).map(|e| DepartmentRef {
            id: e.id,
            name: e.name,
        });
        let labels = active_records(self.labels)
            .map(|e| LabelRef {
                id: e.id,
                name: e.name,
                color: e.color,
            })
            .collect();
        let queue = self
            .queue
            .filter(WireRecord::is_active)
            .and_then(WireRecord::into_entry)
            .map(|e| QueueRef {
                id: e.id,
                name: e.name,
                color: e.color,
            });

        Ok(Ticket {
            id,
            number,
            title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            status,
            status_entry,
            priority,
            priority_entry,
            created_at,
            sla_deadline,
            request_type: self.request_type.map(WireRequestType::into_request_type),
            responsible_user: self.responsible_user.and_then(WireUser::into_ref),
            assignee: self.assignee.and_then(WireUser::into_ref),
            department,
            labels,
            queue,
        })
    }
}

/// Extract the record array from a payload, unwrapping a known envelope key.
fn records_from_value(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                match map.remove(*key) {
                    Some(Value::Array(records)) => return Ok(records),
                    Some(nested @ Value::Object(_)) => return records_from_value(nested),
                    _ => {}
                }
            }
            Err(HelpdeskError::InvalidPayload(format!(
                "expected an array or one of {{{}}}",
                ENVELOPE_KEYS.join(", ")
            )))
        }
        other => Err(HelpdeskError::InvalidPayload(format!(
            "expected an array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalize an already-parsed ticket payload.
pub fn tickets_from_value(value: Value) -> Result<Vec<Ticket>> {
    let records = records_from_value(value)?;
    let total = records.len();

    let tickets: Vec<Ticket> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let wire: WireTicket = match serde_json::from_value(record) {
                Ok(wire) => wire,
                Err(e) => {
                    tracing::warn!("skipping ticket record #{index}: {e}");
                    return None;
                }
            };
            match wire.into_ticket() {
                Ok(ticket) => Some(ticket),
                Err(reason) => {
                    tracing::warn!("skipping ticket record #{index}: {reason}");
                    None
                }
            }
        })
        .collect();

    tracing::debug!("normalized {} of {} ticket records", tickets.len(), total);
    Ok(tickets)
}

/// Parse and normalize a JSON ticket payload.
pub fn parse_ticket_payload(json: &str) -> Result<Vec<Ticket>> {
    tickets_from_value(serde_json::from_str(json)?)
}

/// Normalize a status, priority or queue catalog payload. Inactive records are dropped.
pub fn catalog_from_value(value: Value) -> Result<Vec<CatalogEntry>> {
    let records = records_from_value(value)?;
    let wire: Vec<WireRecord> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(wire) => Some(wire),
            Err(e) => {
                tracing::warn!("skipping catalog record #{index}: {e}");
                None
            }
        })
        .collect();
    Ok(active_records(wire).collect())
}

pub fn parse_catalog_payload(json: &str) -> Result<Vec<CatalogEntry>> {
    catalog_from_value(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TicketPriority, TicketStatus};

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = ts("2024-05-06T09:00:00Z");
        assert_eq!(parse_timestamp("2024-05-06T09:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-06T11:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-06 09:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-06T09:00:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-05-06").unwrap(),
            ts("2024-05-06T00:00:00Z")
        );
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(HelpdeskError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_minimal_record() {
        let tickets = parse_ticket_payload(r#"[{"id": 42, "title": "Broken laptop"}]"#).unwrap();
        assert_eq!(tickets.len(), 1);
        let t = &tickets[0];
        assert_eq!(t.id, "42");
        assert_eq!(t.number, 42);
        assert_eq!(t.status, Code::Known(TicketStatus::Open));
        assert_eq!(t.priority, Code::Known(TicketPriority::Medium));
        assert!(t.created_at.is_none());
        assert!(t.labels.is_empty());
    }

    #[test]
    fn test_full_snake_case_record() {
        let json = r##"{
            "data": [{
                "id": "a1b2",
                "number": "1007",
                "title": "Email bouncing",
                "description": "",
                "status": {"id": 3, "name": "In Progress", "color": "#f59e0b"},
                "priority": "Urgent",
                "created_at": "2024-05-06 09:00:00",
                "request_type": {"id": 2, "name": "Incident", "sla": "240"},
                "responsible_user": {"id": 9, "name": "Dana", "email": "dana@example.com"},
                "department": {"id": 1, "name": "IT"},
                "labels": [
                    {"id": 1, "name": "email", "color": "#ff0000", "is_active": 1},
                    {"id": 2, "name": "legacy", "is_active": "0"}
                ],
                "queue": {"id": 5, "name": "Tier 1", "color": "#00ff00", "is_active": true}
            }]
        }"##;
        let tickets = parse_ticket_payload(json).unwrap();
        let t = &tickets[0];
        assert_eq!(t.number, 1007);
        assert_eq!(t.description, None);
        assert_eq!(t.status, Code::Known(TicketStatus::InProgress));
        let entry = t.status_entry.as_ref().unwrap();
        assert_eq!(entry.id, "3");
        assert_eq!(entry.name, "In Progress");
        assert_eq!(entry.color.as_deref(), Some("#f59e0b"));
        assert_eq!(t.priority, Code::Known(TicketPriority::Critical));
        assert!(t.priority_entry.is_none());
        assert_eq!(t.created_at, Some(ts("2024-05-06T09:00:00Z")));
        assert_eq!(t.request_type.as_ref().and_then(|r| r.sla), Some(240));
        assert_eq!(t.sla_deadline(), Some(ts("2024-05-06T13:00:00Z")));
        assert_eq!(t.owner().map(|u| u.name.as_str()), Some("Dana"));
        assert_eq!(t.department_name(), Some("IT"));
        assert_eq!(t.labels.len(), 1);
        assert_eq!(t.labels[0].name, "email");
        assert_eq!(t.queue.as_ref().map(|q| q.name.as_str()), Some("Tier 1"));
    }

    #[test]
    fn test_camel_case_record() {
        let json = r#"{"tickets": [{
            "id": "x", "ticketNumber": 3, "subject": "Badge reader",
            "createdAt": "2024-05-06T09:00:00Z",
            "slaDeadline": "2024-05-06T10:00:00Z",
            "requestType": {"name": "Access", "slaMinutes": 30},
            "responsibleUser": {"userId": "u1", "fullName": "Kim"},
            "tags": null
        }]}"#;
        let tickets = parse_ticket_payload(json).unwrap();
        let t = &tickets[0];
        assert_eq!(t.number, 3);
        assert_eq!(t.title, "Badge reader");
        assert_eq!(t.sla_deadline, Some(ts("2024-05-06T10:00:00Z")));
        assert_eq!(t.sla_deadline(), Some(ts("2024-05-06T10:00:00Z")));
        assert_eq!(t.responsible_user.as_ref().map(|u| u.id.as_str()), Some("u1"));
    }

    #[test]
    fn test_unparseable_timestamp_keeps_ticket() {
        let json = r#"[{"id": 1, "title": "t", "created_at": "not a date"}]"#;
        let tickets = parse_ticket_payload(json).unwrap();
        assert_eq!(tickets.len(), 1);
        assert!(tickets[0].created_at.is_none());
    }

    #[test]
    fn test_epoch_timestamps() {
        let json = r#"[
            {"id": 1, "title": "secs", "created_at": 1714986000},
            {"id": 2, "title": "millis", "created_at": 1714986000000}
        ]"#;
        let tickets = parse_ticket_payload(json).unwrap();
        assert_eq!(tickets[0].created_at, Some(ts("2024-05-06T09:00:00Z")));
        assert_eq!(tickets[1].created_at, tickets[0].created_at);
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let json = r#"[
            {"title": "no id"},
            {"id": "abc", "title": "no number"},
            {"id": 5, "title": "   "},
            {"id": 6, "title": "bad labels", "labels": "oops"},
            {"id": 7, "title": "ok"}
        ]"#;
        let tickets = parse_ticket_payload(json).unwrap();
        let numbers: Vec<u64> = tickets.iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![7]);
    }

    #[test]
    fn test_unknown_status_preserved() {
        let json = r#"[{"id": 1, "title": "t", "status": "Waiting on vendor", "priority": "p9"}]"#;
        let t = &parse_ticket_payload(json).unwrap()[0];
        assert_eq!(t.status, Code::Unknown("waiting_on_vendor".to_string()));
        assert_eq!(t.priority, Code::Unknown("p9".to_string()));
    }

    #[test]
    fn test_status_aliases() {
        let json = r#"[
            {"id": 1, "title": "a", "status": "New", "priority": "URGENT"},
            {"id": 2, "title": "b", "status": "pending", "priority": "normal"},
            {"id": 3, "title": "c", "status": "Done"}
        ]"#;
        let tickets = parse_ticket_payload(json).unwrap();
        assert_eq!(tickets[0].status, Code::Known(TicketStatus::Open));
        assert_eq!(tickets[0].priority, Code::Known(TicketPriority::Critical));
        assert_eq!(tickets[1].status, Code::Known(TicketStatus::InProgress));
        assert_eq!(tickets[1].priority, Code::Known(TicketPriority::Medium));
        assert_eq!(tickets[2].status, Code::Known(TicketStatus::Resolved));
    }

    #[test]
    fn test_extreme_epoch_is_dropped_softly() {
        let json = r#"[{"id": 1, "title": "t", "created_at": -9223372036854775808}]"#;
        let tickets = parse_ticket_payload(json).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].created_at, None);
    }

    #[test]
    fn test_invalid_top_level() {
        assert!(matches!(
            parse_ticket_payload(r#"{"foo": []}"#),
            Err(HelpdeskError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_ticket_payload("42"),
            Err(HelpdeskError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_ticket_payload("{not json"),
            Err(HelpdeskError::Json(_))
        ));
    }

    #[test]
    fn test_nested_envelope() {
        let json = r#"{"data": {"items": [{"id": 1, "title": "nested"}]}}"#;
        assert_eq!(parse_ticket_payload(json).unwrap().len(), 1);
    }

    #[test]
    fn test_catalog_payload_drops_inactive() {
        let json = r##"[
            {"id": 1, "name": "Open", "color": "#3b82f6", "is_active": 1},
            {"id": 2, "name": "Legacy", "color": "#999999", "is_active": 0},
            {"id": 3, "name": "Closed", "color": ""}
        ]"##;
        let entries = parse_catalog_payload(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].color.as_deref(), Some("#3b82f6"));
        assert_eq!(entries[1].name, "Closed");
        assert_eq!(entries[1].color, None);
    }
}
