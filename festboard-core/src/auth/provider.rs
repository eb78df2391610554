//! Scoped access to the shared [`AuthContext`]
//!
//! Work running inside [`AuthProvider::scope`] (or [`AuthProvider::mount`]) can reach the
//! context through [`use_auth`] without it being passed down explicitly.

use super::{AuthContext, AuthError};
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT_AUTH: Arc<AuthContext>;
}

pub struct AuthProvider;

impl AuthProvider {
    /// Run `f` with `auth` available to [`use_auth`]
    pub async fn scope<F: Future>(auth: Arc<AuthContext>, f: F) -> F::Output {
        CURRENT_AUTH.scope(auth, f).await
    }

    /// Synchronous variant of [`scope`](Self::scope)
    pub fn sync_scope<R>(auth: Arc<AuthContext>, f: impl FnOnce() -> R) -> R {
        CURRENT_AUTH.sync_scope(auth, f)
    }

    /// Install `auth`, run the identity check, and run `f` alongside it
    ///
    /// `f` starts while the state is still `Loading`, the same way views render before the
    /// identity check has answered.
    pub async fn mount<F: Future>(auth: Arc<AuthContext>, f: F) -> F::Output {
        let bootstrap = auth.clone();
        CURRENT_AUTH
            .scope(auth, async move {
                let (_, output) = tokio::join!(bootstrap.bootstrap(), f);
                output
            })
            .await
    }
}

/// The context installed by the enclosing [`AuthProvider`]
///
/// # Panics
///
/// When called outside any provider scope.
pub fn use_auth() -> Arc<AuthContext> {
    match try_use_auth() {
        Ok(auth) => auth,
        Err(_) => panic!("use_auth must be used within an AuthProvider"),
    }
}

pub fn try_use_auth() -> Result<Arc<AuthContext>, AuthError> {
    CURRENT_AUTH.try_with(Arc::clone).map_err(|_| AuthError::OutsideProvider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;

    #[tokio::test]
    async fn test_scope_exposes_context() {
        let h = TestHarness::new("http://127.0.0.1:9", "/admin");
        let auth = h.auth();

        let inside =
            AuthProvider::scope(auth.clone(), async { Arc::ptr_eq(&use_auth(), &auth) }).await;
        assert!(inside);
    }

    #[test]
    fn test_outside_provider() {
        assert!(matches!(try_use_auth(), Err(AuthError::OutsideProvider)));
        let result = std::panic::catch_unwind(use_auth);
        assert!(result.is_err());
    }

    #[test]
    fn test_sync_scope() {
        let h = TestHarness::new("http://127.0.0.1:9", "/admin");
        let loading = AuthProvider::sync_scope(h.auth(), || use_auth().is_loading());
        assert!(loading);
    }

    #[tokio::test]
    async fn test_mount_runs_identity_check() {
        let h = TestHarness::new("http://127.0.0.1:9", "/admin");
        let auth = h.auth();

        let mut rx = auth.subscribe();
        let state = AuthProvider::mount(auth.clone(), async move {
            while rx.borrow_and_update().is_loading() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
            use_auth().state()
        })
        .await;

        assert!(!state.is_loading());
        assert!(!auth.has_permission("view_dashboard"));
    }
}
