use super::Env;
use anyhow::{bail, Result};
use festboard_core::http::GuardResult;
use festboard_core::rbac::{Permission, RoleName, SUPER_ADMIN_ROLE};
use std::fmt::Write;

pub async fn can(env: &Env, permission: &str) -> Result<()> {
    if !Permission::is_known(permission) {
        log::warn!("'{}' is not in the permission catalog", permission);
    }

    let state = env.auth.bootstrap().await;
    if !state.is_authenticated() {
        env.report_redirect();
        bail!("not logged in");
    }

    if env.auth.has_permission(permission) {
        println!("allowed: {}", permission);
        Ok(())
    } else {
        bail!("denied: {}", permission)
    }
}

pub fn guard(env: &Env, target: &str) -> Result<()> {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    let cookie = env.auth.session().cookie_header();

    println!("{}", describe_guard(&env.guard().check(path, cookie.as_deref())));
    if path == env.config.routes.login_path {
        println!("after login: {}", env.guard().return_destination(query));
    }
    Ok(())
}

fn describe_guard(result: &GuardResult) -> String {
    match result {
        GuardResult::Allow => "allow".to_string(),
        GuardResult::Redirect(location) => format!("redirect {}", location),
    }
}

/// Role catalog as printed by `festboard roles`
pub fn render_roles() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: every permission", SUPER_ADMIN_ROLE);
    for role in RoleName::ALL {
        let permissions: Vec<&str> = role.permissions().iter().map(|p| p.as_str()).collect();
        let _ = writeln!(out, "{}: {}", role, permissions.join(", "));
    }
    out
}
