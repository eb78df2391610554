//! Sessions configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Longest cookie lifetime browsers honour (400 days)
pub const MAX_COOKIE_AGE_DAYS: u32 = 400;

/// Sessions configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Durable storage key holding the token
    /// Default: "token"
    pub storage_key: String,

    /// File backing durable storage for non-browser hosts
    /// Env: FESTBOARD_STORAGE_PATH
    /// Default: ".festboard/storage.json"
    pub storage_path: String,

    /// Name of the cookie mirroring the token
    /// Default: "token"
    pub cookie_name: String,

    /// Cookie lifetime in days
    /// Env: FESTBOARD_COOKIE_MAX_AGE_DAYS
    /// Default: 7, at most [`MAX_COOKIE_AGE_DAYS`]
    pub max_age_days: u32,

    /// Set Secure flag on the cookie (HTTPS only)
    /// Env: FESTBOARD_COOKIE_SECURE
    /// Default: true
    pub cookie_secure: bool,

    /// SameSite policy: "Strict", "Lax", or "None"
    /// Default: "Strict"
    pub cookie_samesite: String,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            storage_key: "token".to_string(),
            storage_path: ".festboard/storage.json".to_string(),
            cookie_name: "token".to_string(),
            max_age_days: 7,
            cookie_secure: true,
            cookie_samesite: "Strict".to_string(),
        }
    }
}

impl SessionsConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(path) = env::var("FESTBOARD_STORAGE_PATH") {
            self.storage_path = path;
        }

        if let Ok(days) = env::var("FESTBOARD_COOKIE_MAX_AGE_DAYS") {
            if let Ok(d) = days.parse() {
                self.max_age_days = d;
            }
        }

        if let Ok(secure) = env::var("FESTBOARD_COOKIE_SECURE") {
            self.cookie_secure = secure.parse().unwrap_or(true);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            bail!("Invalid storage_key: must not be empty");
        }

        if self.cookie_name.is_empty() || self.cookie_name.contains(['=', ';', ' ']) {
            bail!("Invalid cookie_name: must be a non-empty cookie token");
        }

        if self.max_age_days == 0 || self.max_age_days > MAX_COOKIE_AGE_DAYS {
            bail!("Invalid max_age_days: must be between 1 and {}", MAX_COOKIE_AGE_DAYS);
        }

        if !["Strict", "Lax", "None"].contains(&self.cookie_samesite.as_str()) {
            bail!("Invalid cookie_samesite: must be Strict, Lax, or None");
        }

        if self.cookie_samesite == "None" && !self.cookie_secure {
            bail!("Invalid cookie settings: SameSite=None requires cookie_secure");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SessionsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_max_age_days_bounds() {
        let zero = SessionsConfig { max_age_days: 0, ..Default::default() };
        assert!(zero.validate().is_err());

        let huge = SessionsConfig { max_age_days: 200_000_000, ..Default::default() };
        assert!(huge.validate().is_err());

        let cap = SessionsConfig { max_age_days: MAX_COOKIE_AGE_DAYS, ..Default::default() };
        assert!(cap.validate().is_ok());
    }

    #[test]
    fn test_invalid_cookie_name() {
        let config = SessionsConfig { cookie_name: "to ken".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_samesite_none_requires_secure() {
        let config = SessionsConfig {
            cookie_samesite: "None".to_string(),
            cookie_secure: false,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
