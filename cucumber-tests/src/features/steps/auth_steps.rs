use crate::features::world::FestboardWorld;
use cucumber::{given, then, when};
use festboard_core::rbac::{Permission, RoleName};
use festboard_core::{ApiError, AuthState};
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const SLOW_IDENTITY: Duration = Duration::from_millis(300);

fn catalog_permissions(role: &str) -> Vec<String> {
    let role: RoleName = role.parse().expect("unknown role in scenario");
    role.permissions().iter().map(|p| p.to_string()).collect()
}

fn permission_list(list: &str) -> Vec<String> {
    list.split(',').map(str::trim).filter(|p| !p.is_empty()).map(String::from).collect()
}

// ==================== BACKGROUND ====================

#[given(expr = "a running festival API")]
async fn given_running_api(world: &mut FestboardWorld) {
    world.start_api().await;
}

#[given(expr = "a stored session")]
async fn given_stored_session(world: &mut FestboardWorld) {
    world.session().save("stored-token").expect("Failed to store session");
}

#[given(expr = "the user is on {string}")]
async fn given_user_on(world: &mut FestboardWorld, path: String) {
    world.navigator.visit(path);
}

// ==================== API BEHAVIOUR ====================

#[given(expr = "the API identifies the session as {string} with the catalog permissions of {string}")]
async fn given_identity_catalog(world: &mut FestboardWorld, role: String, catalog_role: String) {
    world.mount_identity(&role, &catalog_permissions(&catalog_role), Duration::ZERO).await;
}

#[given(expr = "the API identifies the session as {string} with permissions {string}")]
async fn given_identity(world: &mut FestboardWorld, role: String, permissions: String) {
    world.mount_identity(&role, &permission_list(&permissions), Duration::ZERO).await;
}

#[given(expr = "the API slowly identifies the session as {string} with permissions {string}")]
async fn given_slow_identity(world: &mut FestboardWorld, role: String, permissions: String) {
    world.mount_identity(&role, &permission_list(&permissions), SLOW_IDENTITY).await;
}

#[given(expr = "the API accepts a login as {string} with the catalog permissions of {string}")]
async fn given_login_accepted(world: &mut FestboardWorld, role: String, catalog_role: String) {
    world.mount_login(&role, &catalog_permissions(&catalog_role)).await;
}

#[given(expr = "the API rejects logins with {string}")]
async fn given_login_rejected(world: &mut FestboardWorld, message: String) {
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "message": message })),
        )
        .mount(world.server())
        .await;
}

#[given(expr = "the API rejects every request as unauthorized")]
async fn given_all_unauthorized(world: &mut FestboardWorld) {
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "jwt expired" }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(world.server())
        .await;
}

// ==================== ACTIONS ====================

#[when(expr = "the dashboard starts")]
async fn when_dashboard_starts(world: &mut FestboardWorld) {
    world.auth().bootstrap().await;
}

#[when(expr = "the dashboard starts without waiting")]
async fn when_dashboard_starts_in_background(world: &mut FestboardWorld) {
    let auth = world.auth().clone();
    let mut rx = auth.subscribe();
    world.pending_bootstrap = Some(tokio::spawn(async move { auth.bootstrap().await }));

    while !rx.borrow_and_update().is_loading() {
        rx.changed().await.expect("auth state channel closed");
    }
}

#[when(expr = "the identity check completes")]
async fn when_identity_completes(world: &mut FestboardWorld) {
    let pending = world.pending_bootstrap.take().expect("no identity check in flight");
    pending.await.expect("identity check panicked");
}

#[when(expr = "the user logs in as {string} with password {string}")]
async fn when_user_logs_in(world: &mut FestboardWorld, username: String, password: String) {
    match world.auth().login(&username, &password).await {
        Ok(user) => {
            world.remembered_permissions = user.permissions.into_iter().collect();
            world.last_error = None;
        }
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when(expr = "the user logs out")]
async fn when_user_logs_out(world: &mut FestboardWorld) {
    world.auth().logout();
}

#[when(expr = "the page is reloaded")]
async fn when_page_reloaded(world: &mut FestboardWorld) {
    let auth = world.fresh_auth();
    auth.bootstrap().await;
    world.auth = Some(auth);
}

#[when(expr = "{int} requests are in flight at once")]
async fn when_concurrent_requests(world: &mut FestboardWorld, count: usize) {
    world.removes_before = world.storage.removes();
    let api = world.auth().api().clone();

    let calls = (0..count).map(|i| {
        let api = api.clone();
        async move { api.get_json::<Value>(&format!("/programs/{}", i)).await }
    });
    let results = futures::future::join_all(calls).await;

    world.requests_sent = count;
    world.requests_unauthorized =
        results.iter().filter(|r| matches!(r, Err(ApiError::Unauthorized { .. }))).count();
}

// ==================== ASSERTIONS ====================

#[then(expr = "the user holds exactly the catalog permissions of {string}")]
async fn then_exact_catalog(world: &mut FestboardWorld, role: String) {
    let granted = catalog_permissions(&role);
    let auth = world.auth();
    for permission in Permission::ALL {
        assert_eq!(
            auth.has_permission(permission),
            granted.contains(&permission.to_string()),
            "{} / {}",
            role,
            permission
        );
    }
}

#[then(expr = "every catalog permission is granted")]
async fn then_all_granted(world: &mut FestboardWorld) {
    assert!(world.auth().has_all_permissions(Permission::ALL));
}

#[then(expr = "no catalog permission is granted")]
async fn then_none_granted(world: &mut FestboardWorld) {
    assert!(!world.auth().has_any_permission(Permission::ALL));
}

#[then(expr = "the auth state is loading")]
async fn then_state_loading(world: &mut FestboardWorld) {
    assert!(world.auth().is_loading());
}

#[then(expr = "the auth state is unauthenticated")]
async fn then_state_unauthenticated(world: &mut FestboardWorld) {
    assert_eq!(world.auth().state(), AuthState::Unauthenticated);
}

#[then(expr = "no session is stored")]
async fn then_no_session(world: &mut FestboardWorld) {
    assert_eq!(world.session().read(), None);
    assert!(!world.session().has_cookie());
}

#[then(expr = "the session cookie is set")]
async fn then_cookie_set(world: &mut FestboardWorld) {
    assert!(world.session().has_cookie());
}

#[then(expr = "the user was redirected to {string} exactly once")]
async fn then_redirected_once(world: &mut FestboardWorld, target: String) {
    assert_eq!(world.navigator.history(), vec![target]);
}

#[then(expr = "the user was not redirected")]
async fn then_not_redirected(world: &mut FestboardWorld) {
    assert_eq!(world.navigator.redirect_count(), 0);
}

#[then(expr = "the user holds the same permissions as after login")]
async fn then_same_permissions(world: &mut FestboardWorld) {
    let user = world.auth().user().expect("not authenticated after reload");
    let reloaded: Vec<String> = user.permissions.into_iter().collect();
    assert!(!world.remembered_permissions.is_empty());
    assert_eq!(reloaded, world.remembered_permissions);
}

#[then(expr = "the login fails with {string}")]
async fn then_login_fails(world: &mut FestboardWorld, message: String) {
    assert_eq!(world.last_error.as_deref(), Some(message.as_str()));
}

#[then(expr = "every request failed as unauthorized")]
async fn then_all_unauthorized(world: &mut FestboardWorld) {
    assert!(world.requests_sent > 0, "no requests were made");
    assert_eq!(world.requests_unauthorized, world.requests_sent);
}

#[then(expr = "the session was cleared once")]
async fn then_cleared_once(world: &mut FestboardWorld) {
    // Token and cookie are removed together
    assert_eq!(world.storage.removes() - world.removes_before, 2);
}
