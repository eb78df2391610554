//! Role catalog
//!
//! Documents which permissions each coarse role is expected to carry. The server remains the
//! authority: a signed-in user's permissions come from the identity endpoint, not from here.

use super::permissions::Permission;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Server-assigned role that passes every permission check.
pub const SUPER_ADMIN_ROLE: &str = "Super Admin";

/// Coarse role names known to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Organizer,
    Judge,
    Student,
    Guest,
}

impl RoleName {
    pub const ALL: [RoleName; 5] =
        [RoleName::Admin, RoleName::Organizer, RoleName::Judge, RoleName::Student, RoleName::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Organizer => "organizer",
            RoleName::Judge => "judge",
            RoleName::Student => "student",
            RoleName::Guest => "guest",
        }
    }

    /// Permissions the catalog grants this role
    pub fn permissions(&self) -> &'static [Permission] {
        role_permissions(*self)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    /// Role names from the server are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

const ADMIN: &[Permission] = &Permission::ALL;

const ORGANIZER: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewStudents,
    Permission::ManageStudents,
    Permission::ImportStudents,
    Permission::ViewTeams,
    Permission::ManageTeams,
    Permission::ViewPrograms,
    Permission::ManagePrograms,
    Permission::ViewCategories,
    Permission::ManageCategories,
    Permission::ViewEvents,
    Permission::ManageEvents,
    Permission::ViewResults,
    Permission::PublishResults,
];

const JUDGE: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewPrograms,
    Permission::JudgePrograms,
    Permission::ViewEvents,
    Permission::ViewResults,
];

const STUDENT: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewPrograms,
    Permission::ViewEvents,
    Permission::ViewResults,
];

const GUEST: &[Permission] = &[Permission::ViewEvents, Permission::ViewResults];

/// Static role -> permission table
pub fn role_permissions(role: RoleName) -> &'static [Permission] {
    match role {
        RoleName::Admin => ADMIN,
        RoleName::Organizer => ORGANIZER,
        RoleName::Judge => JUDGE,
        RoleName::Student => STUDENT,
        RoleName::Guest => GUEST,
    }
}

/// Role definition
#[derive(Debug, Clone)]
pub struct Role {
    /// Role name
    pub name: String,

    /// Permissions granted by this role
    pub permissions: HashSet<String>,
}

impl Role {
    /// Create a new role
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), permissions: HashSet::new() }
    }

    /// Add a permission
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Check if role has a permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Materialize a catalog role
    pub fn from_catalog(role: RoleName) -> Self {
        role.permissions()
            .iter()
            .fold(Role::new(role.as_str()), |r, p| r.with_permission(p.as_str()))
    }
}
