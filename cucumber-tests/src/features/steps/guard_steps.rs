use crate::features::world::FestboardWorld;
use cucumber::{given, then, when};
use festboard_core::http::{GuardResult, RouteGuard};
use http::{header, Request};

#[given(expr = "no session cookie")]
async fn given_no_cookie(world: &mut FestboardWorld) {
    world.guard_cookie = None;
}

#[given(expr = "a session cookie {string}")]
async fn given_cookie(world: &mut FestboardWorld, cookie: String) {
    world.guard_cookie = Some(cookie);
}

#[when(expr = "the browser requests {string}")]
async fn when_browser_requests(world: &mut FestboardWorld, path: String) {
    let mut request = Request::builder().uri(path.as_str());
    if let Some(cookie) = &world.guard_cookie {
        request = request.header(header::COOKIE, cookie.as_str());
    }
    let request = request.body(()).expect("Failed to build request");

    let guard = RouteGuard::new(&world.config.routes, world.config.sessions.cookie_name.clone());
    world.guard_result = Some(guard.check_request(&request));
}

#[then(expr = "the guard redirects to {string}")]
async fn then_guard_redirects(world: &mut FestboardWorld, location: String) {
    assert_eq!(world.guard_result, Some(GuardResult::Redirect(location)));

    let response = world
        .guard_result
        .clone()
        .and_then(GuardResult::into_response)
        .expect("redirect renders a response")
        .expect("valid redirect response");
    assert_eq!(response.status(), http::StatusCode::TEMPORARY_REDIRECT);
}

#[then(expr = "the guard allows the request")]
async fn then_guard_allows(world: &mut FestboardWorld) {
    assert_eq!(world.guard_result, Some(GuardResult::Allow));
}
