/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory store so the install wizard
/// can be driven end-to-end without a database.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use learnhouse_api::app::{build_router, AppState};
use learnhouse_api::config::{ApiConfig, Config, DatabaseConfig};
use learnhouse_shared::auth::password::PasswordHasher;
use learnhouse_shared::config::GeneralConfig;
use learnhouse_shared::install::InstallService;
use learnhouse_shared::store::MemoryInstallStore;
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;

/// Test context holding the router and the store behind it
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryInstallStore>,
}

impl TestContext {
    /// Router with install mode on
    pub fn new() -> Self {
        Self::with_general(GeneralConfig::installing())
    }

    /// Router with install mode off
    pub fn provisioned() -> Self {
        Self::with_general(GeneralConfig::default())
    }

    fn with_general(general: GeneralConfig) -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
            },
            general,
        };

        let store = Arc::new(MemoryInstallStore::new());
        let hasher = PasswordHasher::with_cost(4096, 1, 1).unwrap();
        let service = InstallService::with_hasher(store.clone(), hasher);
        let app = build_router(AppState::with_service(service, config));

        Self { app, store }
    }

    /// Sends a request with an optional JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a request and returns status plus parsed JSON body
    pub async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }
}
