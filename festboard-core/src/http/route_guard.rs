//! Route Guard - edge-level protection of the admin area
//!
//! Runs on every navigation request before any page renders. Only the *presence* of the session
//! cookie is checked; whether the token is still valid is decided later by the auth context's
//! identity check.
//!
//! Rules, in order:
//! 1. protected path without session cookie -> login, with the requested path as `redirect`
//! 2. login view with a session cookie -> default entry of the protected area
//! 3. anything else -> allow
//!
//! Example:
//! ```ignore
//! let guard = RouteGuard::new(&RoutesConfig::default(), "token");
//! match guard.check_request(&request) {
//!     GuardResult::Allow => next(request),
//!     redirect => redirect.into_response().unwrap(),
//! }
//! ```

use crate::config::RoutesConfig;
use crate::session::extract_cookie;
use bytes::Bytes;
use http::{header, Request, Response, StatusCode};
use http_body_util::Full;

/// Result of a route guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResult {
    /// Navigation proceeds unchanged
    Allow,
    /// Navigation is replaced by a redirect to this location
    Redirect(String),
}

impl GuardResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardResult::Allow)
    }

    /// Render as an HTTP response; `None` for [`GuardResult::Allow`]
    pub fn into_response(self) -> Option<Result<Response<Full<Bytes>>, http::Error>> {
        match self {
            GuardResult::Allow => None,
            GuardResult::Redirect(location) => Some(
                Response::builder()
                    .status(StatusCode::TEMPORARY_REDIRECT)
                    .header(header::LOCATION, location)
                    .header(header::CACHE_CONTROL, "no-store")
                    .body(Full::new(Bytes::new())),
            ),
        }
    }
}

/// Cookie-presence guard for the protected area and the login view
#[derive(Debug, Clone)]
pub struct RouteGuard {
    protected_prefix: String,
    login_path: String,
    default_entry: String,
    redirect_param: String,
    cookie_name: String,
}

impl RouteGuard {
    pub fn new(routes: &RoutesConfig, cookie_name: impl Into<String>) -> Self {
        Self {
            protected_prefix: routes.protected_prefix.trim_end_matches('/').to_string(),
            login_path: routes.login_path.clone(),
            default_entry: routes.default_entry.clone(),
            redirect_param: routes.redirect_param.clone(),
            cookie_name: cookie_name.into(),
        }
    }

    /// `/admin` and everything below it, but not `/administrator`
    pub fn is_protected(&self, path: &str) -> bool {
        match path.strip_prefix(&self.protected_prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Evaluate the rules for `path` given the request's `Cookie` header
    pub fn check(&self, path: &str, cookie_header: Option<&str>) -> GuardResult {
        let has_session =
            cookie_header.and_then(|h| extract_cookie(h, &self.cookie_name)).is_some();

        if self.is_protected(path) && !has_session {
            let location = format!(
                "{}?{}={}",
                self.login_path,
                self.redirect_param,
                urlencoding::encode(path)
            );
            log::debug!("Guard: no session for {}, redirecting to login", path);
            return GuardResult::Redirect(location);
        }

        if path == self.login_path && has_session {
            log::debug!(
                "Guard: session present on login view, redirecting to {}",
                self.default_entry
            );
            return GuardResult::Redirect(self.default_entry.clone());
        }

        GuardResult::Allow
    }

    /// Evaluate the rules for an incoming request
    ///
    /// All `Cookie` headers are considered, as HTTP/2 clients may split them.
    pub fn check_request<B>(&self, req: &Request<B>) -> GuardResult {
        let cookies: Vec<&str> = req
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        let joined = cookies.join("; ");

        self.check(req.uri().path(), if joined.is_empty() { None } else { Some(joined.as_str()) })
    }

    /// Where to go after a successful login
    ///
    /// Honours the `redirect` query parameter only when it names a path inside the protected
    /// area; anything else (absolute URLs, `//host`, other sections) falls back to the default
    /// entry so the parameter cannot be used as an open redirect.
    pub fn return_destination(&self, query: Option<&str>) -> String {
        let requested = query.and_then(|q| {
            q.trim_start_matches('?').split('&').find_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                if key == self.redirect_param {
                    urlencoding::decode(value).ok().map(|v| v.into_owned())
                } else {
                    None
                }
            })
        });

        match requested {
            Some(path)
                if path.starts_with('/')
                    && !path.starts_with("//")
                    && !path.contains('\\')
                    && self.is_protected(path.split(['?', '#']).next().unwrap_or(path.as_str())) =>
            {
                path
            }
            _ => self.default_entry.clone(),
        }
    }
}
