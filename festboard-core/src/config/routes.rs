//! Route surface configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Paths the route guard and the auth context navigate between
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Everything under this prefix requires a session cookie
    /// Env: FESTBOARD_PROTECTED_PREFIX
    /// Default: "/admin"
    pub protected_prefix: String,

    /// Public login view
    /// Env: FESTBOARD_LOGIN_PATH
    /// Default: "/login"
    pub login_path: String,

    /// Where a signed-in visitor of the login view is sent
    /// Default: "/admin"
    pub default_entry: String,

    /// Query parameter carrying the originally requested path
    /// Default: "redirect"
    pub redirect_param: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            protected_prefix: "/admin".to_string(),
            login_path: "/login".to_string(),
            default_entry: "/admin".to_string(),
            redirect_param: "redirect".to_string(),
        }
    }
}

impl RoutesConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(prefix) = env::var("FESTBOARD_PROTECTED_PREFIX") {
            self.protected_prefix = prefix;
        }
        if let Ok(login) = env::var("FESTBOARD_LOGIN_PATH") {
            self.login_path = login;
        }
    }

    /// Whether `path` is the protected prefix itself or a segment below it
    pub fn is_protected(&self, path: &str) -> bool {
        match path.strip_prefix(self.protected_prefix.trim_end_matches('/')) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("protected_prefix", &self.protected_prefix),
            ("login_path", &self.login_path),
            ("default_entry", &self.default_entry),
        ] {
            if !value.starts_with('/') {
                bail!("Invalid routes.{}: must be an absolute path", field);
            }
        }

        if self.protected_prefix == "/" {
            bail!("Invalid routes.protected_prefix: \"/\" would lock out the login view");
        }

        if self.is_protected(&self.login_path) {
            bail!("Invalid routes.login_path: must not live under the protected prefix");
        }

        if self.redirect_param.is_empty() {
            bail!("Invalid routes.redirect_param: must not be empty");
        }

        Ok(())
    }
}
