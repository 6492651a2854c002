//! Runtime configuration, loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "INVENTORY_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "INVENTORY_API_TIMEOUT_SECS";
pub const ENV_SESSION_FILE: &str = "INVENTORY_SESSION_FILE";

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be an http(s) URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Where the API lives and how the client talks to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// JSON file holding the persisted session. `None` keeps the session in memory.
    pub session_file: Option<PathBuf>,
    /// Capacity of the cache actor's request channel.
    pub channel_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            session_file: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source; unset or blank
    /// variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    name: ENV_BASE_URL,
                    value: url,
                });
            }
            config.base_url = url;
        }

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    name: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.session_file = get(ENV_SESSION_FILE).map(PathBuf::from);
        Ok(config)
    }
}
