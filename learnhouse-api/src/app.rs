/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use learnhouse_api::{app::{build_router, AppState}, config::Config};
/// use learnhouse_shared::db::pool::{create_pool, DatabaseConfig};
/// use learnhouse_shared::store::PgInstallStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgInstallStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::{config::Config, middleware::install_mode::install_mode_layer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use learnhouse_shared::{install::InstallService, store::InstallStore};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Install wizard operations
    pub install: Arc<InstallService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state over a store with default password hashing
    pub fn new(store: Arc<dyn InstallStore>, config: Config) -> Self {
        Self::with_service(InstallService::new(store), config)
    }

    /// Creates state around a prepared install service
    pub fn with_service(install: InstallService, config: Config) -> Self {
        Self {
            install: Arc::new(install),
            config: Arc::new(config),
        }
    }

    /// Backing store, for health checks
    pub fn store(&self) -> &Arc<dyn InstallStore> {
        self.install.store()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// └── /api/v1/install/            # install-mode gate
///     ├── POST /start
///     ├── GET  /latest
///     ├── POST /update?step=N
///     ├── POST /default_elements
///     ├── POST /org
///     └── POST /user?org_slug=S
/// ```
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let install_routes = Router::new()
        .route("/start", post(routes::install::start_install))
        .route("/latest", get(routes::install::get_latest_install))
        .route("/update", post(routes::install::update_install))
        .route("/default_elements", post(routes::install::install_default_elements))
        .route("/org", post(routes::install::create_organization))
        .route("/user", post(routes::install::create_organization_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            install_mode_layer,
        ));

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api/v1/install", install_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
