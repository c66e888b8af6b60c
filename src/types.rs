use std::fmt;
use std::str::FromStr;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enum_display_fromstr;
use crate::error::HelpdeskError;
use crate::macros::normalize_code;

/// Conventional number of tickets per page in list views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filter value meaning "do not filter on this field".
pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

enum_display_fromstr!(
    TicketStatus,
    HelpdeskError::invalid_status,
    {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
);

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// Resolved and closed tickets are no longer subject to SLA monitoring.
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

pub const VALID_STATUSES: &[&str] = &["open", "in_progress", "resolved", "closed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

enum_display_fromstr!(
    TicketPriority,
    HelpdeskError::invalid_priority,
    {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
);

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Critical,
    ];

    /// Urgency weight, higher is more urgent.
    pub fn weight(self) -> u8 {
        match self {
            TicketPriority::Low => 1,
            TicketPriority::Medium => 2,
            TicketPriority::High => 3,
            TicketPriority::Critical => 4,
        }
    }
}

pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];

/// An enumerated code as received from the backend.
///
/// Codes inside the closed set parse into `Known`; anything else is kept
/// verbatim in `Unknown` so it can still be displayed and filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Code<T> {
    Known(T),
    Unknown(String),
}

impl<T: FromStr> Code<T> {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<T>() {
            Ok(value) => Code::Known(value),
            Err(_) => Code::Unknown(raw.trim().to_string()),
        }
    }
}

impl<T: Copy> Code<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Code::Known(value) => Some(*value),
            Code::Unknown(_) => None,
        }
    }
}

impl<T: Default> Default for Code<T> {
    fn default() -> Self {
        Code::Known(T::default())
    }
}

impl<T> From<T> for Code<T> {
    fn from(value: T) -> Self {
        Code::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Code<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Known(value) => value.fmt(f),
            Code::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl<T: fmt::Display> Serialize for Code<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Code<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Code::parse(&raw))
    }
}

/// Code enums whose backend vocabulary includes aliases of the canonical names.
pub trait CodeVocabulary: FromStr {
    /// Normalize spelling and case, then map known aliases onto canonical codes.
    fn canonical_code(raw: &str) -> String;
}

impl CodeVocabulary for TicketStatus {
    fn canonical_code(raw: &str) -> String {
        let code = normalize_code(raw);
        match code.as_str() {
            "new" | "opened" | "reopened" => "open".to_string(),
            "pending" | "in_work" | "working" | "assigned" => "in_progress".to_string(),
            "done" | "solved" | "fixed" => "resolved".to_string(),
            "archived" | "cancelled" | "canceled" => "closed".to_string(),
            _ => code,
        }
    }
}

impl CodeVocabulary for TicketPriority {
    fn canonical_code(raw: &str) -> String {
        let code = normalize_code(raw);
        match code.as_str() {
            "urgent" | "blocker" | "highest" => "critical".to_string(),
            "normal" | "moderate" => "medium".to_string(),
            "lowest" | "minor" => "low".to_string(),
            _ => code,
        }
    }
}

impl<T: CodeVocabulary> Code<T> {
    /// Parse a backend or user-supplied value through the shared vocabulary,
    /// so `Waiting on vendor` and `waiting_on_vendor` yield the same code.
    pub fn canonical(raw: &str) -> Self {
        Code::parse(&T::canonical_code(raw))
    }
}

pub type StatusCode = Code<TicketStatus>;
pub type PriorityCode = Code<TicketPriority>;

/// A catalog record (status, priority or queue) carrying its own name and color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Denormalized snapshot of a user; not a live link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A named, colored routing bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// SLA budget in minutes. `None` or zero means no SLA is tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<u32>,
}

/// Read-only projection of a support ticket as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub number: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_entry: Option<CatalogEntry>,
    pub priority: PriorityCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_entry: Option<CatalogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_deadline: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<RequestType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_user: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueRef>,
}

impl Ticket {
    /// Effective SLA deadline: the explicit deadline if given, otherwise
    /// `created_at` plus the request type's SLA budget.
    pub fn sla_deadline(&self) -> Option<Timestamp> {
        if let Some(deadline) = self.sla_deadline {
            return Some(deadline);
        }
        let created = self.created_at?;
        let minutes = self.request_type.as_ref()?.sla.filter(|m| *m > 0)?;
        created
            .checked_add(SignedDuration::from_mins(i64::from(minutes)))
            .ok()
    }

    /// The user responsible for the ticket, preferring the explicit
    /// responsible user over the assignee.
    pub fn owner(&self) -> Option<&UserRef> {
        self.responsible_user.as_ref().or(self.assignee.as_ref())
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department.as_ref().map(|d| d.name.as_str())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.known().is_some_and(TicketStatus::is_terminal)
    }
}
