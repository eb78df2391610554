//! Session store: the single owner of the token's durable copy and its cookie mirror

use super::cookie::{CookieConfig, CookieJar, SessionCookie, StoredCookieJar};
use super::storage::{MemoryTokenStorage, TokenStorage};
use crate::config::SessionsConfig;
use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Persists the bearer token in durable storage and mirrors it into a cookie.
///
/// Both copies are only ever written together, through [`save`](Self::save) and
/// [`clear`](Self::clear).
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    cookies: Arc<dyn CookieJar>,
    cookie: SessionCookie,
    storage_key: String,
    // Set once the session has been revoked; reset by `save`
    revoked: AtomicBool,
    write_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn TokenStorage>,
        cookies: Arc<dyn CookieJar>,
        config: &SessionsConfig,
    ) -> Self {
        Self {
            storage,
            cookies,
            cookie: SessionCookie::new(CookieConfig::from(config)),
            storage_key: config.storage_key.clone(),
            revoked: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    /// Store whose token and cookie both live in one storage backend
    pub fn with_storage(storage: Arc<dyn TokenStorage>, config: &SessionsConfig) -> Self {
        let cookies = Arc::new(StoredCookieJar::new(storage.clone()));
        Self::new(storage, cookies, config)
    }

    /// Process-local store with default settings
    pub fn in_memory() -> Self {
        Self::with_storage(Arc::new(MemoryTokenStorage::new()), &SessionsConfig::default())
    }

    /// Persist `token` and write the mirrored cookie
    ///
    /// Either both copies are written or neither is.
    pub fn save(&self, token: &str) -> Result<()> {
        let _guard = self.lock();
        if self.cookie.max_age() <= 0 {
            bail!("session cookie max age must be positive");
        }

        self.storage.set(&self.storage_key, token)?;
        if let Err(e) = self.cookies.set(&self.cookie.build_set_cookie(token)) {
            if let Err(rollback) = self.storage.remove(&self.storage_key) {
                log::warn!("Failed to roll back session token: {}", rollback);
            }
            return Err(e.context("Failed to write session cookie"));
        }
        self.revoked.store(false, Ordering::SeqCst);
        log::debug!("Session saved");
        Ok(())
    }

    /// Current token, if any. Storage failures read as "no session".
    pub fn read(&self) -> Option<String> {
        match self.storage.get(&self.storage_key) {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    /// Whether the cookie mirror currently holds a token
    pub fn has_cookie(&self) -> bool {
        self.cookies.get(self.cookie.name()).is_some()
    }

    /// Value for a `Cookie` request header carrying the session cookie
    pub fn cookie_header(&self) -> Option<String> {
        self.cookies.get(self.cookie.name()).map(|v| format!("{}={}", self.cookie.name(), v))
    }

    /// Remove the durable copy and expire the cookie
    ///
    /// Both removals are attempted even if one fails.
    pub fn clear(&self) {
        let _guard = self.lock();
        if let Err(e) = self.storage.remove(&self.storage_key) {
            log::warn!("Failed to remove session token: {}", e);
        }
        if let Err(e) = self.cookies.set(&self.cookie.build_delete_cookie()) {
            log::warn!("Failed to expire session cookie: {}", e);
        }
        log::debug!("Session cleared");
    }

    /// Clear the session in response to a rejected credential.
    ///
    /// Returns `true` only for the first call since the last [`save`](Self::save); later calls
    /// are no-ops. Callers use the return value to decide who performs the login redirect.
    pub fn revoke(&self) -> bool {
        if self.revoked.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.clear();
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded section holds no data; a poisoned lock is still usable
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("storage_key", &self.storage_key)
            .field("cookie", &self.cookie.name())
            .field("has_token", &self.read().is_some())
            .finish()
    }
}
