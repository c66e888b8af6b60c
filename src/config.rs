//! Top-level application configuration.
//!
//! Configuration is stored in `.helpdesk/config.yaml` (or the file named by
//! `HELPDESK_CONFIG`) and includes:
//! - The webhook API base URL and bearer token
//! - Request timeout
//! - Default page size for list views
//! - SLA risk thresholds

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HelpdeskError, Result};
use crate::sla::RiskThresholds;
use crate::types::DEFAULT_PAGE_SIZE;

pub const CONFIG_ENV: &str = "HELPDESK_CONFIG";
pub const API_URL_ENV: &str = "HELPDESK_API_URL";
pub const API_TOKEN_ENV: &str = "HELPDESK_API_TOKEN";

const DEFAULT_CONFIG_PATH: &str = ".helpdesk/config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Webhook API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Tickets per page in list views (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// SLA risk band cutoffs (default: 70/90)
    #[serde(default, skip_serializing_if = "RiskThresholds::is_default")]
    pub sla: RiskThresholds,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            page_size: default_page_size(),
            sla: RiskThresholds::default(),
        }
    }
}

/// Webhook API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Load configuration from file (or defaults), then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            HelpdeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }

    /// Override API settings from environment variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.api.base_url = Some(url);
        }
        if let Some(token) = lookup(API_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.api.token = Some(token);
        }
    }

    /// Reject settings the rest of the crate cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.sla.is_valid() {
            return Err(HelpdeskError::Config(format!(
                "sla thresholds must satisfy 0 < warning_threshold < critical_threshold <= 100 (got {} / {})",
                self.sla.warning_threshold, self.sla.critical_threshold
            )));
        }
        if self.page_size == 0 {
            return Err(HelpdeskError::Config(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(HelpdeskError::Config(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        if let Some(url) = &self.api.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(HelpdeskError::Config(format!(
                "api.base_url must start with http:// or https:// (got '{url}')"
            )));
        }
        Ok(())
    }

    /// Base URL of the webhook API, if configured
    pub fn api_base_url(&self) -> Option<&str> {
        self.api.base_url.as_deref()
    }
}
