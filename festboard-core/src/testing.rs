//! Test fixtures shared by the unit tests

use crate::auth::AuthContext;
use crate::config::FestboardConfig;
use crate::http::ApiClient;
use crate::navigation::MemoryNavigator;
use crate::session::{MemoryTokenStorage, SessionStore, TokenStorage};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory storage that counts writes and removals
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryTokenStorage,
    sets: AtomicUsize,
    removes: AtomicUsize,
}

impl CountingStorage {
    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

impl TokenStorage for CountingStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key)
    }
}

/// API client wired to a mock server, with in-memory session and navigation
pub struct TestHarness {
    pub config: FestboardConfig,
    pub storage: Arc<CountingStorage>,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<MemoryNavigator>,
    pub api: ApiClient,
}

impl TestHarness {
    pub fn new(base_url: &str, current_path: &str) -> Self {
        let mut config = FestboardConfig::default();
        config.api.base_url = base_url.to_string();
        Self::with_config(config, current_path)
    }

    pub fn with_config(config: FestboardConfig, current_path: &str) -> Self {
        let storage = Arc::new(CountingStorage::default());
        let session = Arc::new(SessionStore::with_storage(storage.clone(), &config.sessions));
        let navigator = Arc::new(MemoryNavigator::new(current_path));
        let api = ApiClient::new(&config.api, &config.routes, session.clone(), navigator.clone())
            .expect("test api client");

        Self { config, storage, session, navigator, api }
    }

    /// Fresh auth context over this harness's client, in `Loading`
    pub fn auth(&self) -> Arc<AuthContext> {
        Arc::new(AuthContext::new(self.api.clone(), &self.config.rbac, &self.config.routes))
    }
}

pub fn user_json(role: &str, permissions: &[&str]) -> Value {
    let permissions: Vec<Value> = permissions.iter().map(|p| json!({ "name": p })).collect();
    json!({
        "_id": format!("user-{}", role.to_lowercase().replace(' ', "-")),
        "username": role.to_lowercase().replace(' ', "_"),
        "role": {
            "_id": format!("role-{}", role.to_lowercase().replace(' ', "-")),
            "name": role,
            "permissions": permissions,
        }
    })
}

/// `GET /users/me` body
pub fn me_body(role: &str, permissions: &[&str]) -> Value {
    json!({ "user": user_json(role, permissions) })
}

/// `POST /users/login` body
pub fn login_body(token: &str, role: &str, permissions: &[&str]) -> Value {
    json!({ "token": token, "user": user_json(role, permissions) })
}
