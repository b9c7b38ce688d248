use crate::RouterState;
use crate::endpoints::error::ApiError;
use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use querier::{QueryRequest, Series};
use serde::Serialize;
use serde_json::json;

/// Successful query response: `{"metrics": [Series...]}`
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<Series>,
}

/// Create OVS metric query routes
pub fn router<S: RouterState>() -> Router<S> {
    Router::new()
        .route("/metrics", get(list_metrics::<S>))
        .route("/count/metric/:metric_id", get(count::<S>))
        .route(
            "/topk/metric/:metric_id/duration/:duration_id/rank/:rank_id",
            get(top_k::<S>),
        )
        .route(
            "/groupby/metric/:metric_id/duration/:duration_id",
            get(group_by::<S>),
        )
}

/// GET /metrics
///
/// List the metric identifiers the catalog knows about
#[tracing::instrument]
pub async fn list_metrics<S: RouterState>(state: State<S>) -> impl IntoResponse {
    Json(json!({ "metrics": state.catalog().entries() }))
}

/// GET /count/metric/:metric_id
///
/// Number of distinct (bridge, port) series for a metric
#[tracing::instrument]
pub async fn count<S: RouterState>(
    State(state): State<S>,
    Path(metric_id): Path<String>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metric = resolve_metric(&state, &metric_id)?;
    run(&state, QueryRequest::count(metric)).await
}

/// GET /topk/metric/:metric_id/duration/:duration_id/rank/:rank_id
///
/// Top ranked (bridge, port) pairs by averaged rate
#[tracing::instrument]
pub async fn top_k<S: RouterState>(
    State(state): State<S>,
    Path((metric_id, duration_id, rank_id)): Path<(String, String, String)>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let rank: i64 = rank_id.trim().parse().map_err(|_| {
        ApiError::bad_request(format!(
            "Failed while reading the rank: '{rank_id}' is not an integer"
        ))
    })?;
    let metric = resolve_metric(&state, &metric_id)?;
    run(&state, QueryRequest::top_k(metric, duration_id, rank)).await
}

/// GET /groupby/metric/:metric_id/duration/:duration_id
///
/// Averaged rate per (bridge, port) over the configured lookback window
#[tracing::instrument]
pub async fn group_by<S: RouterState>(
    State(state): State<S>,
    Path((metric_id, duration_id)): Path<(String, String)>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metric = resolve_metric(&state, &metric_id)?;
    run(&state, QueryRequest::group_average(metric, duration_id)).await
}

fn resolve_metric<S: RouterState>(state: &S, metric_id: &str) -> Result<String, ApiError> {
    state.catalog().resolve(metric_id).map_err(|e| {
        ApiError::bad_request(format!("Failed while resolving the metric: {e}"))
    })
}

async fn run<S: RouterState>(
    state: &S,
    request: QueryRequest,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metrics = state.querier().execute(&request).await?;
    Ok(Json(MetricsResponse { metrics }))
}
