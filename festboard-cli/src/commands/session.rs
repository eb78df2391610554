use super::Env;
use anyhow::{bail, Context, Result};
use festboard_core::{AuthState, User};
use std::io::BufRead;

pub async fn login(
    env: &Env,
    username: &str,
    password: Option<String>,
    redirect: Option<&str>,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    env.navigator.visit(env.config.routes.login_path.clone());
    let user = env.auth.login(username, &password).await?;

    println!("Logged in as {}", describe(&user));
    println!("Continue to {}", env.guard().return_destination(redirect));
    Ok(())
}

pub async fn whoami(env: &Env) -> Result<()> {
    match env.auth.bootstrap().await {
        AuthState::Authenticated(user) => {
            println!("{}", describe(&user));
            if env.auth.is_super_admin() {
                println!("  (all permissions)");
            }
            for permission in &user.permissions {
                println!("  {}", permission);
            }
            Ok(())
        }
        _ => {
            env.report_redirect();
            bail!("not logged in")
        }
    }
}

pub fn logout(env: &Env) -> Result<()> {
    env.auth.logout();
    println!("Logged out");
    Ok(())
}

fn describe(user: &User) -> String {
    match &user.team_id {
        Some(team) => format!("{} ({}, team {})", user.username, user.role_name, team),
        None => format!("{} ({})", user.username, user.role_name),
    }
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_persists_session_across_envs() {
        let server = MockServer::start().await;
        let mut body = test_support::me_body("Organizer", &["view_events"]);
        body["token"] = json!("tok-1");
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let env = test_support::env(tmp.path(), &server.uri());
        login(&env, "asha", Some("pw".into()), None).await.unwrap();

        // A second invocation sees the same token
        let again = test_support::env(tmp.path(), &server.uri());
        assert_eq!(again.auth.session().read().as_deref(), Some("tok-1"));

        logout(&again).unwrap();
        let after = test_support::env(tmp.path(), &server.uri());
        assert_eq!(after.auth.session().read(), None);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Account locked"})),
            )
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let env = test_support::env(tmp.path(), &server.uri());
        let err = login(&env, "asha", Some("pw".into()), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Account locked");
    }

    #[tokio::test]
    async fn test_whoami_without_session() {
        let tmp = tempfile::tempdir().unwrap();
        let env = test_support::env(tmp.path(), "http://127.0.0.1:9");
        assert!(whoami(&env).await.is_err());
    }

    #[test]
    fn test_describe() {
        let user = User {
            id: "u".into(),
            username: "asha".into(),
            team_id: Some("red".into()),
            role_id: None,
            role_name: "Student".into(),
            permissions: Default::default(),
        };
        assert_eq!(describe(&user), "asha (Student, team red)");
    }
}
