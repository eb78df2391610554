use cucumber::World as CucumberWorld;
use festboard_core::config::FestboardConfig;
use festboard_core::http::GuardResult;
use festboard_core::navigation::{MemoryNavigator, Sidebar};
use festboard_core::session::{MemoryTokenStorage, SessionStore, TokenStorage};
use festboard_core::{ApiClient, AuthContext, AuthState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Browser storage stand-in that counts removals
#[derive(Default)]
pub struct RecordingStorage {
    inner: MemoryTokenStorage,
    removes: AtomicUsize,
}

impl RecordingStorage {
    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

impl TokenStorage for RecordingStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key)
    }
}

/// One dashboard instance talking to a mock festival API
#[derive(CucumberWorld)]
#[world(init = Self::new)]
pub struct FestboardWorld {
    pub config: FestboardConfig,
    pub server: Option<MockServer>,
    pub storage: Arc<RecordingStorage>,
    pub navigator: Arc<MemoryNavigator>,
    pub session: Option<Arc<SessionStore>>,
    pub auth: Option<Arc<AuthContext>>,
    pub pending_bootstrap: Option<tokio::task::JoinHandle<AuthState>>,
    pub last_error: Option<String>,
    pub guard_cookie: Option<String>,
    pub guard_result: Option<GuardResult>,
    pub menu_source: Option<Sidebar>,
    pub sidebar: Option<Sidebar>,
    pub remembered_permissions: Vec<String>,
    pub removes_before: usize,
    pub requests_sent: usize,
    pub requests_unauthorized: usize,
}

impl std::fmt::Debug for FestboardWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FestboardWorld")
            .field("server", &self.server.as_ref().map(|s| s.uri()))
            .field("navigator", &self.navigator)
            .field("auth", &self.auth)
            .field("last_error", &self.last_error)
            .field("guard_result", &self.guard_result)
            .finish()
    }
}

impl FestboardWorld {
    pub fn new() -> Self {
        Self {
            config: FestboardConfig::default(),
            server: None,
            storage: Arc::new(RecordingStorage::default()),
            navigator: Arc::new(MemoryNavigator::new("/admin")),
            session: None,
            auth: None,
            pending_bootstrap: None,
            last_error: None,
            guard_cookie: None,
            guard_result: None,
            menu_source: None,
            sidebar: None,
            remembered_permissions: Vec::new(),
            removes_before: 0,
            requests_sent: 0,
            requests_unauthorized: 0,
        }
    }

    /// Start the mock API and wire a client against it
    pub async fn start_api(&mut self) {
        let server = MockServer::start().await;
        self.config.api.base_url = server.uri();
        self.server = Some(server);

        let session =
            Arc::new(SessionStore::with_storage(self.storage.clone(), &self.config.sessions));
        self.session = Some(session);
        self.auth = Some(self.fresh_auth());
    }

    /// New auth context over the same storage, as after a page reload
    pub fn fresh_auth(&self) -> Arc<AuthContext> {
        let api = ApiClient::new(
            &self.config.api,
            &self.config.routes,
            self.session().clone(),
            self.navigator.clone(),
        )
        .expect("Failed to build API client");
        Arc::new(AuthContext::new(api, &self.config.rbac, &self.config.routes))
    }

    pub fn server(&self) -> &MockServer {
        self.server.as_ref().expect("API not started")
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.session.as_ref().expect("API not started")
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        self.auth.as_ref().expect("API not started")
    }

    pub async fn mount_identity(&self, role: &str, permissions: &[String], delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(me_body(role, permissions))
                    .set_delay(delay),
            )
            .mount(self.server())
            .await;
    }

    pub async fn mount_login(&self, role: &str, permissions: &[String]) {
        let mut body = me_body(role, permissions);
        body["token"] = json!(format!("token-{}", role.to_lowercase()));
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(self.server())
            .await;
    }
}

pub fn me_body(role: &str, permissions: &[String]) -> Value {
    let permissions: Vec<Value> = permissions.iter().map(|p| json!({ "name": p })).collect();
    json!({
        "user": {
            "_id": "u-1",
            "username": "festival_user",
            "teamId": "team-red",
            "role": { "_id": "r-1", "name": role, "permissions": permissions }
        }
    })
}
