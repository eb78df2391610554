//! Permission catalog
//!
//! Every capability the dashboard can gate is listed here once. The identifiers are the
//! exact strings the API returns in `role.permissions[].name`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Open the dashboard landing page
pub const VIEW_DASHBOARD: &str = "view_dashboard";
/// Create, edit and deactivate user accounts
pub const MANAGE_USERS: &str = "manage_users";
/// Edit role definitions
pub const MANAGE_ROLES: &str = "manage_roles";
pub const VIEW_STUDENTS: &str = "view_students";
pub const MANAGE_STUDENTS: &str = "manage_students";
/// Bulk CSV import of students
pub const IMPORT_STUDENTS: &str = "import_students";
pub const VIEW_TEAMS: &str = "view_teams";
pub const MANAGE_TEAMS: &str = "manage_teams";
pub const VIEW_PROGRAMS: &str = "view_programs";
pub const MANAGE_PROGRAMS: &str = "manage_programs";
pub const VIEW_CATEGORIES: &str = "view_categories";
pub const MANAGE_CATEGORIES: &str = "manage_categories";
pub const VIEW_EVENTS: &str = "view_events";
pub const MANAGE_EVENTS: &str = "manage_events";
/// Score programs as a judge
pub const JUDGE_PROGRAMS: &str = "judge_programs";
pub const VIEW_RESULTS: &str = "view_results";
/// Make results visible to everyone
pub const PUBLISH_RESULTS: &str = "publish_results";
pub const MANAGE_SETTINGS: &str = "manage_settings";

/// A permission from the closed catalog
///
/// The server may hand out identifiers this enum does not know about; access checks work on
/// plain strings so those still resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    ManageUsers,
    ManageRoles,
    ViewStudents,
    ManageStudents,
    ImportStudents,
    ViewTeams,
    ManageTeams,
    ViewPrograms,
    ManagePrograms,
    ViewCategories,
    ManageCategories,
    ViewEvents,
    ManageEvents,
    JudgePrograms,
    ViewResults,
    PublishResults,
    ManageSettings,
}

impl Permission {
    /// Every catalog entry, in declaration order
    pub const ALL: [Permission; 18] = [
        Permission::ViewDashboard,
        Permission::ManageUsers,
        Permission::ManageRoles,
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
        Permission::JudgePrograms,
        Permission::ViewResults,
        Permission::PublishResults,
        Permission::ManageSettings,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => VIEW_DASHBOARD,
            Permission::ManageUsers => MANAGE_USERS,
            Permission::ManageRoles => MANAGE_ROLES,
            Permission::ViewStudents => VIEW_STUDENTS,
            Permission::ManageStudents => MANAGE_STUDENTS,
            Permission::ImportStudents => IMPORT_STUDENTS,
            Permission::ViewTeams => VIEW_TEAMS,
            Permission::ManageTeams => MANAGE_TEAMS,
            Permission::ViewPrograms => VIEW_PROGRAMS,
            Permission::ManagePrograms => MANAGE_PROGRAMS,
            Permission::ViewCategories => VIEW_CATEGORIES,
            Permission::ManageCategories => MANAGE_CATEGORIES,
            Permission::ViewEvents => VIEW_EVENTS,
            Permission::ManageEvents => MANAGE_EVENTS,
            Permission::JudgePrograms => JUDGE_PROGRAMS,
            Permission::ViewResults => VIEW_RESULTS,
            Permission::PublishResults => PUBLISH_RESULTS,
            Permission::ManageSettings => MANAGE_SETTINGS,
        }
    }

    /// Whether `name` is a catalog identifier
    pub fn is_known(name: &str) -> bool {
        name.parse::<Permission>().is_ok()
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// Returned when parsing a permission identifier that is not in the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);
