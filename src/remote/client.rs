//! HTTP client for the support desk's webhook API.
//!
//! # Security Note - Logging
//!
//! The API token is held in a [`SecretString`] and only exposed when the
//! `Authorization` header is built. Avoid `RUST_LOG=reqwest=debug` in
//! production.

use std::time::Duration;

use reqwest::Client;
use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::error::ApiError;
use super::wire::{catalog_from_value, tickets_from_value};
use crate::config::Config;
use crate::display::Catalog;
use crate::error::{HelpdeskError, Result};
use crate::types::{CatalogEntry, Ticket};

const TICKETS_PATH: &str = "tickets";
const STATUSES_PATH: &str = "statuses";
const PRIORITIES_PATH: &str = "priorities";
const QUEUES_PATH: &str = "queues";

/// Read-only client for the ticket and catalog endpoints.
pub struct WebhookClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl WebhookClient {
    /// Create a client from configuration.
    ///
    /// Fails if no base URL is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.api_base_url().ok_or_else(|| {
            HelpdeskError::Config(
                "API base URL not configured. Set HELPDESK_API_URL or api.base_url in the config, or pass --file".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .connect_timeout(Duration::from_secs(config.api.timeout_secs.min(10)))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.api.token.clone().map(SecretString::from),
        })
    }

    /// Full URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path);
        tracing::debug!("GET {url}");

        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, path, &body).into());
        }

        Ok(response.json::<Value>().await?)
    }

    /// Fetch and normalize every ticket
    pub async fn fetch_tickets(&self) -> Result<Vec<Ticket>> {
        let payload = self.get_json(TICKETS_PATH).await?;
        tickets_from_value(payload)
    }

    async fn fetch_catalog_entries(&self, path: &str) -> Vec<CatalogEntry> {
        match self.get_json(path).await.and_then(catalog_from_value) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("catalog endpoint '{path}' unavailable, using built-in labels: {e}");
                Vec::new()
            }
        }
    }

    /// Fetch the status, priority and queue catalogs.
    ///
    /// Catalogs only enrich labels and colors, so a failing endpoint yields
    /// an empty section instead of an error.
    pub async fn fetch_catalog(&self) -> Catalog {
        let (statuses, priorities, queues) = tokio::join!(
            self.fetch_catalog_entries(STATUSES_PATH),
            self.fetch_catalog_entries(PRIORITIES_PATH),
            self.fetch_catalog_entries(QUEUES_PATH),
        );
        Catalog::new(statuses, priorities, queues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_url(url: &str) -> Config {
        let mut config = Config::default();
        config.api.base_url = Some(url.to_string());
        config
    }

    #[test]
    fn test_requires_base_url() {
        let err = WebhookClient::from_config(&Config::default())
            .err()
            .expect("missing base URL should fail");
        assert!(matches!(err, HelpdeskError::Config(_)));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client =
            WebhookClient::from_config(&config_with_url("https://hooks.example.com/v1/")).unwrap();
        assert_eq!(
            client.endpoint("tickets"),
            "https://hooks.example.com/v1/tickets"
        );
        assert_eq!(
            client.endpoint("/queues"),
            "https://hooks.example.com/v1/queues"
        );
    }
}
