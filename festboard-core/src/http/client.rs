//! The one configured HTTP client every API call goes through
//!
//! Outgoing requests get the session token attached as a bearer credential. A 401 from any
//! authenticated call clears the session and sends the user to the login view before the error
//! is handed back to the caller. Nothing is retried.

use super::error::{error_message, ApiError};
use crate::config::{ApiConfig, RoutesConfig};
use crate::navigation::Navigator;
use crate::session::SessionStore;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

struct Inner {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

/// Bearer-authenticated API client
///
/// Cheap to clone; clones share the underlying connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    pub fn new(
        api: &ApiConfig,
        routes: &RoutesConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let base_url = api.base_url.trim_end_matches('/').to_string();
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(ApiError::InvalidUrl(api.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(api.timeout())
            .user_agent(concat!("festboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                login_path: routes.login_path.clone(),
                session,
                navigator,
            }),
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Request builder with the session token attached, if there is one
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.inner.http.request(method, self.url(path));
        match self.inner.session.read() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send an authenticated request and apply the session-invalid handling
    ///
    /// Non-success statuses become errors; a 401 additionally revokes the session.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(&body);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized { message });
        }

        log::debug!("API call failed with {}", status);
        Err(ApiError::Status { status, message })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(Method::PUT, path).json(body)).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Call an endpoint that does not take a session, such as login
    ///
    /// No bearer token is attached and a 401 is reported as a plain status error without
    /// touching the session.
    pub async fn send_anonymous<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.inner.http.request(method, self.url(path)).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::Status { status, message: error_message(&body) });
        }

        decode(response).await
    }

    /// Clear the session and go to the login view, once per rejected session
    fn handle_unauthorized(&self) {
        if !self.inner.session.revoke() {
            return;
        }

        if self.inner.navigator.current_path() == self.inner.login_path {
            log::debug!("Session rejected while on the login view");
            return;
        }

        log::warn!("Session rejected by API, redirecting to {}", self.inner.login_path);
        self.inner.navigator.redirect(&self.inner.login_path);
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.inner.base_url).finish()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
