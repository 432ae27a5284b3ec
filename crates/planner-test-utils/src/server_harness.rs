//! Test server harness for E2E testing
//!
//! Provides `TestPlannerServer` for spawning real planner server instances
//! backed by in-memory stores.

use crate::fixtures::{test_config, UNREACHABLE_OPENAI_URL};
use crate::memory_store::{InMemoryLearningPlanStore, InMemoryTopicStore, InMemoryUserStore};
use planner_service::config::Config;
use planner_service::routes::{self, AppState};
use planner_service::services::openai_client::OpenAiClient;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the planner server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_register_flow() -> Result<(), anyhow::Error> {
///     let server = TestPlannerServer::spawn().await?;
///     let user = server.register_user("Ada", "ada@example.com", "5550100", "pw").await?;
///     assert_eq!(user["email"], "ada@example.com");
///     Ok(())
/// }
/// ```
pub struct TestPlannerServer {
    addr: SocketAddr,
    config: Config,
    users: Arc<InMemoryUserStore>,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestPlannerServer {
    /// Spawn a server whose completion API is unreachable.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_openai(UNREACHABLE_OPENAI_URL).await
    }

    /// Spawn a server whose completion API lives at `openai_base_url`
    /// (typically a `wiremock::MockServer`).
    ///
    /// The server binds to a random port on 127.0.0.1 and runs in the background.
    pub async fn spawn_with_openai(openai_base_url: &str) -> Result<Self, anyhow::Error> {
        let config = test_config(openai_base_url);

        let completion_api = OpenAiClient::new(&config.openai)
            .map_err(|e| anyhow::anyhow!("Failed to build completion client: {}", e))?;

        let users = Arc::new(InMemoryUserStore::new());
        let state = Arc::new(AppState::new(
            config.clone(),
            users.clone(),
            Arc::new(InMemoryTopicStore::new()),
            Arc::new(InMemoryLearningPlanStore::new()),
            Arc::new(completion_api),
        ));

        // Build routes using the service's real route builder
        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            users,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Backing user store, for inspecting stored hashes.
    pub fn users(&self) -> &InMemoryUserStore {
        &self.users
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Register a user through `POST /users` and return the response body.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        mobile: &str,
        password: &str,
    ) -> Result<Value, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/users", self.url()))
            .json(&json!({
                "name": name,
                "email": email,
                "mobile": mobile,
                "password": password,
            }))
            .send()
            .await?;

        anyhow::ensure!(
            response.status() == reqwest::StatusCode::CREATED,
            "registration failed with {}",
            response.status()
        );
        Ok(response.json().await?)
    }

    /// Log in through `POST /auth/login` and return the access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, anyhow::Error> {
        let body: Value = self
            .client
            .post(format!("{}/auth/login", self.url()))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?
            .json()
            .await?;

        body["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("login returned no token: {}", body))
    }

    /// Register a default user and return a token for it.
    pub async fn authenticated_user(&self) -> Result<(Value, String), anyhow::Error> {
        let user = self
            .register_user("Ada Lovelace", "ada@example.com", "5550100", "correct horse")
            .await?;
        let token = self.login("ada@example.com", "correct horse").await?;
        Ok((user, token))
    }
}

impl Drop for TestPlannerServer {
    fn drop(&mut self) {
        // Abort the HTTP server task so each test releases its port immediately.
        self._handle.abort();
    }
}
