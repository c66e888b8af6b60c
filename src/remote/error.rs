//! Error conversion for webhook API responses.

use std::fmt;

use crate::error::HelpdeskError;

/// Longest response body excerpt carried into an error message.
const MAX_BODY_EXCERPT: usize = 200;

/// A non-success response from the webhook API.
#[derive(Debug)]
pub struct ApiError {
    pub status: reqwest::StatusCode,
    pub message: String,
    /// Endpoint path, for context (e.g. "tickets")
    pub endpoint: String,
}

impl ApiError {
    /// Build an error from a status code and the (possibly long) response body.
    pub fn from_response(status: reqwest::StatusCode, endpoint: &str, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown").to_string()
        } else {
            excerpt(body, MAX_BODY_EXCERPT)
        };
        Self {
            status,
            message,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status.as_u16(), 401 | 403)
    }

    /// Convert this error to a HelpdeskError.
    ///
    /// 401/403 become `Auth`; anything else is an `Api` error. There is no
    /// retry: the caller keeps whatever view it already had.
    pub fn to_helpdesk_error(&self) -> HelpdeskError {
        if self.is_auth_failure() {
            return HelpdeskError::Auth(format!(
                "{} rejected the API token ({}). Set HELPDESK_API_TOKEN or api.token in the config",
                self.endpoint, self.status
            ));
        }
        HelpdeskError::Api {
            status: self.status.as_u16(),
            message: format!("{}: {}", self.endpoint, self.message),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.endpoint, self.status, self.message)
    }
}

impl From<ApiError> for HelpdeskError {
    fn from(error: ApiError) -> Self {
        error.to_helpdesk_error()
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
