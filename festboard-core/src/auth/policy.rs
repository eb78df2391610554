//! Permission decision for an authenticated user

use super::user::User;
use crate::config::RbacConfig;
use crate::rbac::{CatalogPermissionChecker, PermissionChecker};
use std::sync::Arc;

/// Decides whether a user holds a permission
///
/// Order: super-admin bypass, then the role's own permission list, then (when configured) the
/// static catalog.
#[derive(Clone)]
pub struct PermissionPolicy {
    super_admin_role: String,
    catalog: Option<Arc<dyn PermissionChecker>>,
}

impl PermissionPolicy {
    pub fn new(super_admin_role: impl Into<String>) -> Self {
        Self { super_admin_role: super_admin_role.into(), catalog: None }
    }

    pub fn from_config(config: &RbacConfig) -> Self {
        let policy = Self::new(config.super_admin_role.clone());
        if config.enforce_catalog {
            policy.with_catalog(Arc::new(CatalogPermissionChecker::new()))
        } else {
            policy
        }
    }

    /// Also require `checker` to grant the permission to the user's role
    pub fn with_catalog(mut self, checker: Arc<dyn PermissionChecker>) -> Self {
        self.catalog = Some(checker);
        self
    }

    pub fn is_super_admin(&self, user: &User) -> bool {
        user.role_name == self.super_admin_role
    }

    pub fn allows(&self, user: &User, permission: &str) -> bool {
        if self.is_super_admin(user) {
            return true;
        }
        if !user.lists_permission(permission) {
            return false;
        }
        match &self.catalog {
            Some(checker) => checker.has_permission(&user.role_name, permission),
            None => true,
        }
    }
}

impl std::fmt::Debug for PermissionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionPolicy")
            .field("super_admin_role", &self.super_admin_role)
            .field("enforce_catalog", &self.catalog.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::permissions::*;

    fn user(role: &str, permissions: &[&str]) -> User {
        User {
            id: "u".into(),
            username: "u".into(),
            team_id: None,
            role_id: None,
            role_name: role.into(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_listed_permission_allowed() {
        let policy = PermissionPolicy::new("Super Admin");
        let u = user("Organizer", &[VIEW_EVENTS]);
        assert!(policy.allows(&u, VIEW_EVENTS));
        assert!(!policy.allows(&u, MANAGE_USERS));
    }

    #[test]
    fn test_super_admin_bypass() {
        let policy = PermissionPolicy::new("Super Admin");
        let u = user("Super Admin", &[]);
        assert!(policy.allows(&u, MANAGE_SETTINGS));
        assert!(policy.allows(&u, "not_in_any_catalog"));
    }

    #[test]
    fn test_role_name_match_is_exact() {
        let policy = PermissionPolicy::new("Super Admin");
        assert!(!policy.allows(&user("super admin", &[]), VIEW_DASHBOARD));
    }

    #[test]
    fn test_catalog_intersection() {
        let config = RbacConfig { enforce_catalog: true, ..Default::default() };
        let policy = PermissionPolicy::from_config(&config);

        // The API says the judge may manage users; the catalog disagrees
        let judge = user("Judge", &[JUDGE_PROGRAMS, MANAGE_USERS]);
        assert!(policy.allows(&judge, JUDGE_PROGRAMS));
        assert!(!policy.allows(&judge, MANAGE_USERS));

        // Catalog alone never grants
        let judge = user("Judge", &[]);
        assert!(!policy.allows(&judge, JUDGE_PROGRAMS));

        assert!(policy.allows(&user("Super Admin", &[]), MANAGE_USERS));
    }
}
