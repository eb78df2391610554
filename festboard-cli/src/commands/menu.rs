use super::Env;
use anyhow::{bail, Result};
use festboard_core::navigation::Sidebar;
use std::fmt::Write;

pub async fn run(env: &Env, json: bool) -> Result<()> {
    if !env.auth.bootstrap().await.is_authenticated() {
        env.report_redirect();
        bail!("not logged in");
    }

    let sidebar = Sidebar::festival_default().visible_to(&env.auth);
    if json {
        println!("{}", serde_json::to_string_pretty(&sidebar)?);
    } else {
        print!("{}", render(&sidebar));
    }
    Ok(())
}

fn render(sidebar: &Sidebar) -> String {
    let mut out = String::new();
    for item in &sidebar.nav_main {
        let _ = writeln!(out, "{}  {}", item.title, item.url);
        for sub in &item.items {
            let _ = writeln!(out, "  - {}  {}", sub.title, sub.url);
        }
    }
    if !sidebar.projects.is_empty() {
        let _ = writeln!(out);
        for project in &sidebar.projects {
            let _ = writeln!(out, "{}  {}", project.name, project.url);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use festboard_core::navigation::{NavItem, NavSubItem, ProjectItem};

    #[test]
    fn test_render_tree() {
        let sidebar = Sidebar {
            nav_main: vec![NavItem::new("Results", "/admin/results")
                .child(NavSubItem::new("Scoreboard", "/admin/results"))],
            projects: vec![ProjectItem::new("Help", "/admin/help")],
        };

        assert_eq!(
            render(&sidebar),
            "Results  /admin/results\n  - Scoreboard  /admin/results\n\nHelp  /admin/help\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Sidebar { nav_main: vec![], projects: vec![] }), "");
    }
}
