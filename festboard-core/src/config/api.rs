//! Remote API configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Where the dashboard's REST API lives and how long a request may take
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address every endpoint path is joined onto
    /// Env: FESTBOARD_API_URL
    /// Default: "http://localhost:5000/api"
    pub base_url: String,

    /// Request timeout in seconds
    /// Env: FESTBOARD_API_TIMEOUT_SECS
    /// Default: 10
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:5000/api".to_string(), timeout_secs: 10 }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(url) = env::var("FESTBOARD_API_URL") {
            self.base_url = url;
        }

        if let Ok(timeout) = env::var("FESTBOARD_API_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("Invalid api.base_url: must start with http:// or https://");
        }

        if self.timeout_secs == 0 {
            bail!("Invalid api.timeout_secs: must be greater than 0");
        }

        Ok(())
    }
}
