//! RBAC configuration

use crate::rbac::SUPER_ADMIN_ROLE;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacConfig {
    /// Role name that passes every permission check
    /// Env: FESTBOARD_SUPER_ADMIN_ROLE
    pub super_admin_role: String,

    /// Also require the permission to appear in the static role catalog
    /// Env: FESTBOARD_ENFORCE_CATALOG
    /// Default: false
    pub enforce_catalog: bool,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self { super_admin_role: SUPER_ADMIN_ROLE.to_string(), enforce_catalog: false }
    }
}

impl RbacConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(role) = env::var("FESTBOARD_SUPER_ADMIN_ROLE") {
            self.super_admin_role = role;
        }
        if let Ok(enforce) = env::var("FESTBOARD_ENFORCE_CATALOG") {
            self.enforce_catalog = enforce.parse().unwrap_or(false);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.super_admin_role.trim().is_empty() {
            bail!("Invalid rbac.super_admin_role: must not be empty");
        }
        Ok(())
    }
}
