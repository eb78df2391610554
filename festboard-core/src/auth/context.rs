//! Application-wide authentication state
//!
//! One [`AuthContext`] is shared by every view. It owns the auth state machine
//!
//! ```text
//! Loading --identity ok--> Authenticated(user)
//! Loading --no token / rejected--> Unauthenticated
//! Unauthenticated --login ok--> Authenticated(user)
//! any --logout--> Unauthenticated
//! ```
//!
//! and answers permission questions against it. While the state is `Loading` every permission
//! check is `false`.
//!
//! Every logout bumps an epoch counter. Identity checks and logins remember the epoch they
//! started in and drop their result if it has moved on, so a response arriving after the user
//! logged out can never resurrect the session.

use super::policy::PermissionPolicy;
use super::user::{LoginRequest, LoginResponse, MeResponse, User, LOGIN_ENDPOINT, ME_ENDPOINT};
use super::AuthError;
use crate::config::{FestboardConfig, RbacConfig, RoutesConfig};
use crate::http::{ApiClient, ApiError, Method};
use crate::navigation::Navigator;
use crate::session::{SessionStore, TokenStorage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Message shown when the API gives no reason for a failed login
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Identity not yet known
    Loading,
    Authenticated(User),
    Unauthenticated,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Shared auth state plus the operations that move it
pub struct AuthContext {
    api: ApiClient,
    policy: PermissionPolicy,
    login_path: String,
    state: watch::Sender<AuthState>,
    epoch: AtomicU64,
}

impl AuthContext {
    /// Context starting in [`AuthState::Loading`]; call [`bootstrap`](Self::bootstrap) next
    pub fn new(api: ApiClient, rbac: &RbacConfig, routes: &RoutesConfig) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            api,
            policy: PermissionPolicy::from_config(rbac),
            login_path: routes.login_path.clone(),
            state,
            epoch: AtomicU64::new(0),
        }
    }

    /// Wire session store, API client and context from one configuration
    pub fn from_config(
        config: &FestboardConfig,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let session = Arc::new(SessionStore::with_storage(storage, &config.sessions));
        let api = ApiClient::new(&config.api, &config.routes, session, navigator)?;
        Ok(Self::new(api, &config.rbac, &config.routes))
    }

    /// Replace the permission policy
    pub fn with_policy(mut self, policy: PermissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    /// Resolve the initial state from the stored token
    ///
    /// No token means `Unauthenticated` without a network call. Otherwise the identity endpoint
    /// decides; any failure clears the session. Never returns an error.
    pub async fn bootstrap(&self) -> AuthState {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.state.send_replace(AuthState::Loading);

        if self.session().read().is_none() {
            log::debug!("No stored session");
            self.transition(epoch, AuthState::Unauthenticated);
            return self.state();
        }

        match self.api.get_json::<MeResponse>(ME_ENDPOINT).await {
            Ok(me) => {
                let user = User::from(me.user);
                log::info!("Session restored for {} ({})", user.username, user.role_name);
                self.transition(epoch, AuthState::Authenticated(user));
            }
            Err(e) => {
                log::info!("Stored session rejected: {}", e);
                if self.is_current(epoch) {
                    self.session().clear();
                }
                self.transition(epoch, AuthState::Unauthenticated);
            }
        }

        self.state()
    }

    /// Re-run the identity check, e.g. after the user's role was edited
    pub async fn refresh(&self) -> AuthState {
        self.bootstrap().await
    }

    /// Exchange credentials for a session
    ///
    /// On success the token is persisted and the state becomes `Authenticated`. On failure the
    /// session and state are left as they were and the error carries the server's message, or
    /// [`LOGIN_FAILED`] when there is none. A logout that lands before the login completes wins:
    /// nothing stays persisted and the call returns [`AuthError::Superseded`]. Navigation is left
    /// to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let request = LoginRequest { username, password };

        let response: LoginResponse = self
            .api
            .send_anonymous(Method::POST, LOGIN_ENDPOINT, &request)
            .await
            .map_err(|e| {
                log::warn!("Login failed for {}: {}", username, e);
                AuthError::LoginRejected(e.server_message().unwrap_or(LOGIN_FAILED).to_string())
            })?;

        if !self.is_current(epoch) {
            log::debug!("Discarding login response for {} after logout", username);
            return Err(AuthError::Superseded);
        }

        self.session().save(&response.token)?;
        let user = User::from(response.user);

        // A logout that landed during the save has already cleared it; undo what save wrote
        if !self.transition(epoch, AuthState::Authenticated(user.clone())) {
            log::debug!("Discarding login for {} after logout", username);
            self.session().clear();
            return Err(AuthError::Superseded);
        }

        log::info!("Logged in as {} ({})", user.username, user.role_name);
        Ok(user)
    }

    /// End the session locally and go to the login view
    ///
    /// Makes no network call and cannot fail. Calling it twice is harmless.
    pub fn logout(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.session().clear();
        let previous = self.state.send_replace(AuthState::Unauthenticated);
        if let Some(user) = previous.user() {
            log::info!("Logged out {}", user.username);
        }

        let navigator = self.api.navigator();
        if navigator.current_path() != self.login_path {
            navigator.redirect(&self.login_path);
        }
    }

    pub fn has_permission(&self, permission: impl AsRef<str>) -> bool {
        match &*self.state.borrow() {
            AuthState::Authenticated(user) => self.policy.allows(user, permission.as_ref()),
            AuthState::Loading | AuthState::Unauthenticated => false,
        }
    }

    pub fn has_any_permission<I>(&self, permissions: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        permissions.into_iter().any(|p| self.has_permission(p))
    }

    /// `true` for an empty list once authenticated
    pub fn has_all_permissions<I>(&self, permissions: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        match &*self.state.borrow() {
            AuthState::Authenticated(user) => {
                permissions.into_iter().all(|p| self.policy.allows(user, p.as_ref()))
            }
            AuthState::Loading | AuthState::Unauthenticated => false,
        }
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn is_super_admin(&self) -> bool {
        self.state.borrow().user().is_some_and(|u| self.policy.is_super_admin(u))
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    // The epoch is compared under the channel's write lock, so a concurrent logout either lands
    // first (and this is dropped) or overwrites it afterwards.
    fn transition(&self, epoch: u64, next: AuthState) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if self.is_current(epoch) {
                *state = next;
                true
            } else {
                false
            }
        });
        if !applied {
            log::debug!("Ignoring stale auth transition");
        }
        applied
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("state", &*self.state.borrow())
            .field("policy", &self.policy)
            .finish()
    }
}
