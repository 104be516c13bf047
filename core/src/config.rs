//! Client configuration read from the environment.
//!
//! A `.env` file in the working directory is honoured. Explicit values (for
//! example CLI flags) are layered on top by the caller.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const BASE_URL_VAR: &str = "TODO_API_URL";
pub const TIMEOUT_VAR: &str = "TODO_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root; the client appends `/todos/...`.
    pub base_url: String,
    /// Per-request timeout handed to the transport. `None` keeps the
    /// transport's own default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = validate_base_url(url.trim())?;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                var: TIMEOUT_VAR,
                value: raw.clone(),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = validate_base_url(base_url)?;
        Ok(self)
    }
}

fn validate_base_url(url: &str) -> Result<String, ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(ConfigError::InvalidBaseUrl {
            var: BASE_URL_VAR,
            value: url.to_string(),
        })
    }
}
