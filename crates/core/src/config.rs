use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const ENDPOINT_ENV_VAR: &str = "POSTURE_ENDPOINT";
pub const TIMEOUT_ENV_VAR: &str = "POSTURE_TIMEOUT_SECS";

/// Where the analysis service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `POSTURE_ENDPOINT` and `POSTURE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR) {
            config = config.with_endpoint(endpoint)?;
        }
        if let Some(value) = lookup(TIMEOUT_ENV_VAR) {
            let secs = parse_timeout_secs(&value).ok_or_else(|| ConfigError::InvalidTimeout {
                env_var: TIMEOUT_ENV_VAR.to_string(),
                value: value.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        let trimmed = endpoint.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint { endpoint });
        }
        self.endpoint = trimmed.to_string();
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                env_var: "--timeout".to_string(),
                value: secs.to_string(),
            });
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.endpoint)
    }

    pub fn ping_url(&self) -> String {
        format!("{}/ping", self.endpoint)
    }
}

fn parse_timeout_secs(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}
