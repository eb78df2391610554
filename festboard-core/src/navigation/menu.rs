//! Sidebar menu tree and its permission filter
//!
//! The tree is static; what a user sees is recomputed from the current permission predicate on
//! every call. A parent whose own requirement fails is dropped together with its children, and a
//! parent that passes stays visible even if every child is filtered out.

use crate::auth::AuthContext;
use crate::rbac::permissions::*;
use serde::{Deserialize, Serialize};

/// Second-level menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavSubItem {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
}

/// Top-level menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NavSubItem>,
}

/// Shortcut entry in the sidebar's secondary section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
}

impl NavSubItem {
    pub fn new(title: &str, url: &str) -> Self {
        Self { title: title.to_string(), url: url.to_string(), required_permission: None }
    }

    pub fn requires(mut self, permission: &str) -> Self {
        self.required_permission = Some(permission.to_string());
        self
    }
}

impl NavItem {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            icon: None,
            required_permission: None,
            items: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn requires(mut self, permission: &str) -> Self {
        self.required_permission = Some(permission.to_string());
        self
    }

    pub fn child(mut self, item: NavSubItem) -> Self {
        self.items.push(item);
        self
    }
}

impl ProjectItem {
    pub fn new(name: &str, url: &str) -> Self {
        Self { name: name.to_string(), url: url.to_string(), icon: None, required_permission: None }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn requires(mut self, permission: &str) -> Self {
        self.required_permission = Some(permission.to_string());
        self
    }
}

fn visible<F: Fn(&str) -> bool>(required: &Option<String>, has_permission: &F) -> bool {
    match required {
        Some(permission) => has_permission(permission),
        None => true,
    }
}

/// Keep the entries (and, independently, their children) the predicate allows
pub fn filter_nav_items<F>(items: &[NavItem], has_permission: F) -> Vec<NavItem>
where
    F: Fn(&str) -> bool,
{
    items
        .iter()
        .filter(|item| visible(&item.required_permission, &has_permission))
        .map(|item| NavItem {
            items: item
                .items
                .iter()
                .filter(|sub| visible(&sub.required_permission, &has_permission))
                .cloned()
                .collect(),
            ..item.clone()
        })
        .collect()
}

pub fn filter_projects<F>(projects: &[ProjectItem], has_permission: F) -> Vec<ProjectItem>
where
    F: Fn(&str) -> bool,
{
    projects
        .iter()
        .filter(|project| visible(&project.required_permission, &has_permission))
        .cloned()
        .collect()
}

/// The whole sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub nav_main: Vec<NavItem>,
    pub projects: Vec<ProjectItem>,
}

impl Sidebar {
    /// Entries the predicate allows
    pub fn filtered<F>(&self, has_permission: F) -> Sidebar
    where
        F: Fn(&str) -> bool,
    {
        Sidebar {
            nav_main: filter_nav_items(&self.nav_main, &has_permission),
            projects: filter_projects(&self.projects, &has_permission),
        }
    }

    /// Entries the context's current user may open
    pub fn visible_to(&self, auth: &AuthContext) -> Sidebar {
        self.filtered(|permission| auth.has_permission(permission))
    }

    /// The admin dashboard menu
    pub fn festival_default() -> Sidebar {
        let nav_main = vec![
            NavItem::new("Dashboard", "/admin").icon("layout-dashboard").requires(VIEW_DASHBOARD),
            NavItem::new("Students", "/admin/students")
                .icon("graduation-cap")
                .requires(VIEW_STUDENTS)
                .child(NavSubItem::new("All students", "/admin/students"))
                .child(
                    NavSubItem::new("Add student", "/admin/students/new")
                        .requires(MANAGE_STUDENTS),
                )
                .child(
                    NavSubItem::new("Import CSV", "/admin/students/import")
                        .requires(IMPORT_STUDENTS),
                ),
            NavItem::new("Teams", "/admin/teams")
                .icon("users")
                .requires(VIEW_TEAMS)
                .child(NavSubItem::new("All teams", "/admin/teams"))
                .child(NavSubItem::new("New team", "/admin/teams/new").requires(MANAGE_TEAMS)),
            NavItem::new("Programs", "/admin/programs")
                .icon("calendar")
                .requires(VIEW_PROGRAMS)
                .child(NavSubItem::new("All programs", "/admin/programs"))
                .child(
                    NavSubItem::new("New program", "/admin/programs/new").requires(MANAGE_PROGRAMS),
                )
                .child(
                    NavSubItem::new("Categories", "/admin/categories").requires(VIEW_CATEGORIES),
                ),
            NavItem::new("Events", "/admin/events").icon("ticket").requires(VIEW_EVENTS),
            NavItem::new("Judging", "/admin/judging").icon("gavel").requires(JUDGE_PROGRAMS),
            NavItem::new("Results", "/admin/results")
                .icon("trophy")
                .requires(VIEW_RESULTS)
                .child(NavSubItem::new("Scoreboard", "/admin/results"))
                .child(
                    NavSubItem::new("Publish", "/admin/results/publish").requires(PUBLISH_RESULTS),
                ),
            NavItem::new("Users", "/admin/users")
                .icon("shield")
                .requires(MANAGE_USERS)
                .child(NavSubItem::new("Accounts", "/admin/users"))
                .child(NavSubItem::new("Roles", "/admin/roles").requires(MANAGE_ROLES)),
        ];

        let projects = vec![
            ProjectItem::new("Settings", "/admin/settings")
                .icon("settings")
                .requires(MANAGE_SETTINGS),
            ProjectItem::new("Help", "/admin/help").icon("life-buoy"),
        ];

        Sidebar { nav_main, projects }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(allowed: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |p| allowed.contains(&p)
    }

    #[test]
    fn test_parent_gate_hides_passing_child() {
        let tree = vec![NavItem::new("Users", "/admin/users")
            .requires(MANAGE_USERS)
            .child(NavSubItem::new("Events", "/admin/events").requires(VIEW_EVENTS))];

        let visible = filter_nav_items(&tree, only(&[VIEW_EVENTS]));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_passing_parent_kept_without_children() {
        let tree = vec![NavItem::new("Results", "/admin/results")
            .requires(VIEW_RESULTS)
            .child(NavSubItem::new("Publish", "/admin/results/publish").requires(PUBLISH_RESULTS))];

        let visible = filter_nav_items(&tree, only(&[VIEW_RESULTS]));
        assert_eq!(visible.len(), 1);
        assert!(visible[0].items.is_empty());
    }

    #[test]
    fn test_ungated_entries_always_visible() {
        let sidebar = Sidebar::festival_default().filtered(|_| false);
        assert!(sidebar.nav_main.is_empty());
        assert_eq!(sidebar.projects.len(), 1);
        assert_eq!(sidebar.projects[0].name, "Help");
    }

    #[test]
    fn test_children_filtered_independently() {
        let sidebar = Sidebar::festival_default().filtered(only(&[VIEW_STUDENTS, IMPORT_STUDENTS]));

        assert_eq!(sidebar.nav_main.len(), 1);
        let titles: Vec<&str> =
            sidebar.nav_main[0].items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["All students", "Import CSV"]);
    }

    #[test]
    fn test_everything_visible_when_all_granted() {
        let full = Sidebar::festival_default();
        assert_eq!(full.filtered(|_| true), full);
    }

    #[test]
    fn test_default_menu_only_uses_catalog_permissions() {
        use crate::rbac::Permission;

        let sidebar = Sidebar::festival_default();
        let required = sidebar
            .nav_main
            .iter()
            .flat_map(|item| {
                std::iter::once(&item.required_permission)
                    .chain(item.items.iter().map(|s| &s.required_permission))
            })
            .chain(sidebar.projects.iter().map(|p| &p.required_permission))
            .flatten();

        for permission in required {
            assert!(Permission::is_known(permission), "{}", permission);
        }
    }
}
