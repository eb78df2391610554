//! Permission catalog and role table
//!
//! Static data describing what *can* be granted:
//! - [`Permission`]: the closed set of capability identifiers
//! - [`RoleName`] / [`role_permissions`]: which permissions each coarse role is expected to hold
//! - [`SUPER_ADMIN_ROLE`]: the server-assigned role that bypasses every check
//!
//! Access decisions for a signed-in user are made by [`crate::auth::AuthContext`] against the
//! permission list the server returned for that user. The catalog is only consulted at runtime
//! when `rbac.enforce_catalog` is switched on.

mod checker;
pub mod permissions;
mod roles;

pub use checker::CatalogPermissionChecker;
pub use permissions::{Permission, UnknownPermission};
pub use roles::{role_permissions, Role, RoleName, SUPER_ADMIN_ROLE};

/// Trait for checking if a role has a specific permission
pub trait PermissionChecker: Send + Sync {
    /// Check if a given role has the specified permission
    ///
    /// # Arguments
    /// * `role` - The role name (e.g., "organizer", "judge")
    /// * `permission` - The permission name (e.g., "view_events")
    fn has_permission(&self, role: &str, permission: &str) -> bool;
}
