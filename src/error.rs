use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelpdeskError {
    #[error("ticket #{0} not found")]
    TicketNotFound(u64),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("invalid sort field '{0}'")]
    InvalidSortField(String),

    #[error("invalid timestamp '{0}': expected RFC 3339 or 'YYYY-MM-DD HH:MM:SS'")]
    InvalidTimestamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized ticket payload: {0}")]
    InvalidPayload(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl HelpdeskError {
    pub fn invalid_status(s: String) -> Self {
        HelpdeskError::InvalidStatus(s)
    }

    pub fn invalid_priority(s: String) -> Self {
        HelpdeskError::InvalidPriority(s)
    }

    pub fn invalid_sort_field(s: String) -> Self {
        HelpdeskError::InvalidSortField(s)
    }
}

pub type Result<T> = std::result::Result<T, HelpdeskError>;
