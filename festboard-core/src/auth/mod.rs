//! Authentication state, login/logout, and permission checks for the signed-in user
//!
//! ```rust,ignore
//! let auth = Arc::new(AuthContext::from_config(&config, storage, navigator)?);
//! AuthProvider::mount(auth, async {
//!     let auth = use_auth();
//!     if auth.has_permission(MANAGE_STUDENTS) {
//!         // show the "Add student" button
//!     }
//! })
//! .await;
//! ```

mod context;
mod policy;
mod provider;
pub mod user;

#[cfg(test)]
mod security_tests;

pub use context::{AuthContext, AuthState, LOGIN_FAILED};
pub use policy::PermissionPolicy;
pub use provider::{try_use_auth, use_auth, AuthProvider};
pub use user::User;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Credentials refused, or the login call failed. Carries the message to show the user.
    #[error("{0}")]
    LoginRejected(String),

    #[error("login response arrived after logout and was discarded")]
    Superseded,

    #[error("auth context accessed outside of an AuthProvider")]
    OutsideProvider,

    #[error(transparent)]
    Session(#[from] anyhow::Error),
}
