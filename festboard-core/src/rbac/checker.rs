//! Catalog-backed permission checker

use super::roles::{Role, RoleName};
use super::PermissionChecker;
use std::collections::HashMap;

/// Answers permission questions from the static role catalog.
///
/// Role lookups are case-insensitive, matching how role names arrive from the API.
pub struct CatalogPermissionChecker {
    roles: HashMap<String, Role>,
}

impl CatalogPermissionChecker {
    pub fn new() -> Self {
        let roles = RoleName::ALL
            .iter()
            .map(|name| (name.as_str().to_string(), Role::from_catalog(*name)))
            .collect();

        Self { roles }
    }
}

impl Default for CatalogPermissionChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionChecker for CatalogPermissionChecker {
    fn has_permission(&self, role: &str, permission: &str) -> bool {
        match self.roles.get(&role.trim().to_ascii_lowercase()) {
            Some(r) => r.has_permission(permission),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::permissions::Permission;
    use crate::rbac::role_permissions;

    #[test]
    fn test_checker_matches_table() {
        let checker = CatalogPermissionChecker::new();

        for role in RoleName::ALL {
            for p in Permission::ALL {
                assert_eq!(
                    checker.has_permission(role.as_str(), p.as_str()),
                    role_permissions(role).contains(&p),
                    "{} / {}",
                    role,
                    p
                );
            }
        }
    }

    #[test]
    fn test_unknown_role_denied() {
        let checker = CatalogPermissionChecker::new();
        assert!(!checker.has_permission("janitor", "view_events"));
        assert!(checker.has_permission("Judge", "judge_programs"));
    }
}
