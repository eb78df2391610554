//! Access-control properties of the auth context, checked end to end against a mock API

use super::*;
use crate::config::FestboardConfig;
use crate::http::ApiClient;
use crate::navigation::{MemoryNavigator, NavItem, NavSubItem, Navigator, Sidebar};
use crate::rbac::permissions::*;
use crate::rbac::{Permission, RoleName, SUPER_ADMIN_ROLE};
use crate::session::{MemoryTokenStorage, SessionStore, TokenStorage};
use crate::testing::{self, TestHarness};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn signed_in(
    role: &str,
    permissions: &[&str],
) -> (MockServer, TestHarness, Arc<AuthContext>) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(testing::me_body(role, permissions)))
        .mount(&server)
        .await;

    let h = TestHarness::new(&server.uri(), "/admin");
    h.session.save("tok").unwrap();
    let auth = h.auth();
    auth.bootstrap().await;
    (server, h, auth)
}

#[tokio::test]
async fn test_permission_matches_role_table() {
    for role in RoleName::ALL {
        let granted: Vec<&str> = role.permissions().iter().map(|p| p.as_str()).collect();
        let (_server, _h, auth) = signed_in(role.as_str(), &granted).await;

        for permission in Permission::ALL {
            assert_eq!(
                auth.has_permission(permission),
                granted.contains(&permission.as_str()),
                "{} / {}",
                role,
                permission
            );
        }
    }
}

#[tokio::test]
async fn test_super_admin_holds_everything() {
    let (_server, _h, auth) = signed_in(SUPER_ADMIN_ROLE, &[]).await;

    assert!(auth.is_super_admin());
    for permission in Permission::ALL {
        assert!(auth.has_permission(permission));
    }
    assert!(auth.has_permission("some_future_permission"));
}

#[tokio::test]
async fn test_loading_denies_despite_previous_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(testing::me_body(SUPER_ADMIN_ROLE, &[]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let h = TestHarness::new(&server.uri(), "/admin");
    h.session.save("tok").unwrap();
    let auth = h.auth();
    auth.bootstrap().await;
    assert!(auth.has_permission(MANAGE_SETTINGS));

    // Re-check in flight: the cached user must not leak through
    let refresh = tokio::spawn({
        let auth = auth.clone();
        async move { auth.refresh().await }
    });
    let mut rx = auth.subscribe();
    while !rx.borrow_and_update().is_loading() {
        rx.changed().await.unwrap();
    }
    assert!(!auth.has_permission(MANAGE_SETTINGS));
    assert!(auth.user().is_none());

    assert!(refresh.await.unwrap().is_authenticated());
    assert!(auth.has_permission(MANAGE_SETTINGS));
}

#[tokio::test]
async fn test_logout_twice_same_outcome() {
    let (_server, h, auth) = signed_in("Organizer", &[VIEW_EVENTS]).await;
    h.navigator.visit("/admin/events");

    auth.logout();
    let after_one = (auth.state(), h.session.read(), h.navigator.current_path());
    auth.logout();
    let after_two = (auth.state(), h.session.read(), h.navigator.current_path());

    assert_eq!(after_one, after_two);
    assert_eq!(after_two, (AuthState::Unauthenticated, None, "/login".to_string()));
    assert_eq!(h.navigator.redirect_count(), 1);
}

#[tokio::test]
async fn test_login_then_reload_keeps_permissions() {
    let server = MockServer::start().await;
    let granted = [VIEW_DASHBOARD, VIEW_PROGRAMS, JUDGE_PROGRAMS];
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(testing::login_body("tok-7", "Judge", &granted)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(testing::me_body("Judge", &granted)))
        .mount(&server)
        .await;

    let h = TestHarness::new(&server.uri(), "/login");
    let auth = h.auth();
    auth.bootstrap().await;
    let logged_in = auth.login("judge", "pw").await.unwrap();

    // Simulated reload: a fresh context over the same persisted session
    let reloaded = h.auth();
    let state = reloaded.bootstrap().await;
    assert_eq!(state.user().map(|u| &u.permissions), Some(&logged_in.permissions));
}

#[tokio::test]
async fn test_concurrent_401_single_clear_and_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(50)))
        .mount(&server)
        .await;

    let h = TestHarness::new(&server.uri(), "/admin/results");
    h.session.save("expired").unwrap();
    let removes_before = h.storage.removes();

    let calls = ["/students", "/teams", "/programs", "/events", "/results", "/categories"]
        .into_iter()
        .map(|endpoint| {
            let api = h.api.clone();
            tokio::spawn(async move { api.get_json::<Value>(endpoint).await })
        })
        .collect::<Vec<_>>();

    for call in futures::future::join_all(calls).await {
        assert!(call.unwrap().unwrap_err().is_unauthorized());
    }

    // One clear removes the token and the cookie
    assert_eq!(h.storage.removes() - removes_before, 2);
    assert_eq!(h.navigator.history(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_late_identity_response_after_logout_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(testing::me_body("Admin", &[MANAGE_USERS]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let h = TestHarness::new(&server.uri(), "/admin");
    h.session.save("tok").unwrap();
    let auth = h.auth();

    let pending = tokio::spawn({
        let auth = auth.clone();
        async move { auth.bootstrap().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    auth.logout();

    assert_eq!(pending.await.unwrap(), AuthState::Unauthenticated);
    assert!(!auth.has_permission(MANAGE_USERS));
    assert_eq!(h.session.read(), None);
}

/// Storage whose token write blocks long enough for a logout to land mid-save
#[derive(Default)]
struct SlowTokenStorage {
    inner: MemoryTokenStorage,
    writing: AtomicBool,
}

impl TokenStorage for SlowTokenStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if key == "token" {
            self.writing.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(300));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.inner.remove(key)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_logout_during_login_save_wins() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(testing::login_body("tok-9", "Admin", &[MANAGE_USERS])),
        )
        .mount(&server)
        .await;

    let mut config = FestboardConfig::default();
    config.api.base_url = server.uri();
    let storage = Arc::new(SlowTokenStorage::default());
    let session = Arc::new(SessionStore::with_storage(storage.clone(), &config.sessions));
    let navigator = Arc::new(MemoryNavigator::new("/login"));
    let api = ApiClient::new(&config.api, &config.routes, session.clone(), navigator).unwrap();
    let auth = Arc::new(AuthContext::new(api, &config.rbac, &config.routes));

    let pending = tokio::spawn({
        let auth = auth.clone();
        async move { auth.login("admin", "pw").await }
    });
    while !storage.writing.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    auth.logout();

    assert!(matches!(pending.await.unwrap(), Err(AuthError::Superseded)));
    assert_eq!(auth.state(), AuthState::Unauthenticated);
    assert_eq!(session.read(), None);
    assert!(!session.has_cookie());
}

#[tokio::test]
async fn test_parent_gate_precedes_child() {
    let (_server, _h, auth) = signed_in("Guest", &[VIEW_EVENTS]).await;

    let sidebar = Sidebar {
        nav_main: vec![NavItem::new("Users", "/admin/users")
            .requires(MANAGE_USERS)
            .child(NavSubItem::new("Events", "/admin/events").requires(VIEW_EVENTS))],
        projects: Vec::new(),
    };

    assert!(sidebar.visible_to(&auth).nav_main.is_empty());
}

#[tokio::test]
async fn test_menu_empty_while_loading() {
    let h = TestHarness::new("http://127.0.0.1:9", "/admin");
    let auth = h.auth();

    let visible = Sidebar::festival_default().visible_to(&auth);
    assert!(visible.nav_main.is_empty());
    assert!(visible.projects.iter().all(|p| p.required_permission.is_none()));
}
