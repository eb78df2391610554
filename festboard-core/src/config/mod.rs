//! Configuration system for Festboard
//!
//! # Configuration Hierarchy
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Environment Variables** (`FESTBOARD_*`)
//! 2. **Config File** (festboard.toml)
//! 3. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use festboard_core::config::FestboardConfig;
//!
//! let config = FestboardConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod logging;
pub mod rbac;
pub mod routes;
pub mod sessions;

pub use api::ApiConfig;
pub use logging::LoggingConfig;
pub use rbac::RbacConfig;
pub use routes::RoutesConfig;
pub use sessions::SessionsConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "festboard.toml";

/// Complete Festboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FestboardConfig {
    pub api: ApiConfig,
    pub sessions: SessionsConfig,
    pub routes: RoutesConfig,
    pub rbac: RbacConfig,
    pub logging: LoggingConfig,
}

impl FestboardConfig {
    /// Load configuration with full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific file, falling back to defaults if it does not exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.api.merge(other.api);
        self.sessions.merge(other.sessions);
        self.routes.merge(other.routes);
        self.rbac.merge(other.rbac);
        self.logging.merge(other.logging);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.api.apply_env_vars();
        self.sessions.apply_env_vars();
        self.routes.apply_env_vars();
        self.rbac.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.sessions.validate()?;
        self.routes.validate()?;
        self.rbac.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FestboardConfig::default();
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.sessions.cookie_name, "token");
        assert_eq!(config.sessions.max_age_days, 7);
        assert_eq!(config.routes.protected_prefix, "/admin");
        assert_eq!(config.routes.login_path, "/login");
        assert_eq!(config.rbac.super_admin_role, "Super Admin");
        assert!(!config.rbac.enforce_catalog);
    }

    #[test]
    fn test_config_validation() {
        let config = FestboardConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("festboard.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://fest.example.org/api"

[rbac]
enforce_catalog = true
"#,
        )
        .unwrap();

        let config = FestboardConfig::from_file(&path).unwrap();
        assert_eq!(config.api.base_url, "https://fest.example.org/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.rbac.enforce_catalog);
        assert_eq!(config.rbac.super_admin_role, "Super Admin");
        assert_eq!(config.routes.login_path, "/login");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FestboardConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.routes.default_entry, "/admin");
    }

    #[test]
    fn test_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("festboard.toml");
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();
        assert!(FestboardConfig::load_from(&path).is_err());
    }
}
