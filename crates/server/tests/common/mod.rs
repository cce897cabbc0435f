//! Common test utilities for driving the API in-process.
//!
//! The fixture wires an in-memory key-value store and a mock catalog
//! provider into a real router, so every request goes through the same
//! middleware and handlers as in production without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use myshelf_core::config::{SearchConfig, StorageConfig};
use myshelf_core::{
    testing::MockCatalogProvider, CatalogProvider, Config, MemoryStore, Shelf, StorageBackend,
};
use myshelf_server::state::AppState;

/// Re-export fixtures for test convenience
pub use myshelf_core::testing::fixtures;

/// Default account used by [`TestFixture::signed_in`].
pub const EMAIL: &str = "ana@myshelf.test";
pub const NAME: &str = "Ana Silva";

/// Test fixture for in-process API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_work() {
///     let fixture = TestFixture::signed_in().await;
///
///     let response = fixture.post("/api/v1/works", json!({
///         "title": "Dune",
///         "kind": "book"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog provider - configure search results
    pub catalog: Arc<MockCatalogProvider>,
    /// Backing store, shared with the shelf
    pub store: Arc<MemoryStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Wire the mock catalog provider into the state
    pub with_catalog: bool,
    /// Search timeout in seconds
    pub search_timeout_secs: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_catalog: true,
            search_timeout_secs: 10,
        }
    }
}

impl TestConfig {
    /// Create config without any external catalog.
    pub fn without_catalog() -> Self {
        Self {
            with_catalog: false,
            ..Default::default()
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with nobody signed in.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a fixture with [`NAME`] registered and signed in.
    pub async fn signed_in() -> Self {
        let fixture = Self::new().await;
        let response = fixture.register(NAME, EMAIL).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        fixture
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        Self::build(Arc::new(MemoryStore::new()), test_config)
    }

    /// Create a fixture over an existing store, as after a restart.
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self::build(store, TestConfig::default())
    }

    fn build(store: Arc<MemoryStore>, test_config: TestConfig) -> Self {
        let catalog = Arc::new(MockCatalogProvider::new());

        let config = Config {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                ..Default::default()
            },
            search: SearchConfig {
                timeout_secs: test_config.search_timeout_secs,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut shelf = Shelf::new(store.clone());
        shelf.restore_session().expect("Failed to restore session");

        let provider = test_config
            .with_catalog
            .then(|| Arc::clone(&catalog) as Arc<dyn CatalogProvider>);

        let state = Arc::new(AppState::new(config, shelf, provider));
        let router = myshelf_server::api::create_router(state);

        Self {
            router,
            catalog,
            store,
        }
    }

    /// Register an account, which also signs it in.
    pub async fn register(&self, name: &str, email: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/register",
            json!({ "name": name, "email": email, "password": fixtures::PASSWORD }),
        )
        .await
    }

    /// Sign in with the fixture password.
    pub async fn login(&self, email: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/login",
            json!({ "email": email, "password": fixtures::PASSWORD }),
        )
        .await
    }

    /// Add a manual work and return its id.
    pub async fn add_work(&self, title: &str, kind: &str, genre: &str) -> String {
        let response = self
            .post(
                "/api/v1/works",
                json!({ "title": title, "kind": kind, "genre": genre }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["work"]["id"]
            .as_str()
            .expect("work id")
            .to_string()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.request("PATCH", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a WebSocket upgrade handshake for `path`.
    pub async fn ws_upgrade(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("Connection", "upgrade")
            .header("Upgrade", "websocket")
            .header("Sec-WebSocket-Version", "13")
            .header("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ==")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
