use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use common::catalog::MetricCatalog;
use common::config::Configuration;
use querier::MetricsQuerier;
use querier::QuerierError;
use querier::backend::{MetricsBackend, PrometheusClient};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod endpoints;

pub trait RouterState: std::fmt::Debug + Clone + Send + Sync + 'static {
    fn querier(&self) -> &MetricsQuerier;
    fn catalog(&self) -> &MetricCatalog;
    fn config(&self) -> &Configuration;
}

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct AppState {
    querier: MetricsQuerier,
    catalog: Arc<MetricCatalog>,
    config: Arc<Configuration>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.config.backend.url)
            .field("strict", &self.catalog.is_strict())
            .finish()
    }
}

impl AppState {
    /// Create state around an existing backend
    pub fn new(config: Configuration, backend: Arc<dyn MetricsBackend>) -> Self {
        let querier = MetricsQuerier::new(backend, config.backend.range.clone());
        let catalog = MetricCatalog::from_config(&config.metrics);

        Self {
            querier,
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }

    /// Create state backed by the Prometheus HTTP API from `config.backend`
    pub fn from_config(config: Configuration) -> Result<Self, QuerierError> {
        let client = PrometheusClient::new(&config.backend)?;
        log::info!("Using Prometheus backend at {}", client.base_url());
        Ok(Self::new(config, Arc::new(client)))
    }
}

impl RouterState for AppState {
    fn querier(&self) -> &MetricsQuerier {
        &self.querier
    }

    fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    fn config(&self) -> &Configuration {
        &self.config
    }
}

/// Create a new router instance with all routes configured
pub fn create_router<S: RouterState>(state: S) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", endpoints::metrics::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Basic health check endpoint
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
