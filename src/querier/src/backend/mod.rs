pub mod model;
pub mod prometheus;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::query::RenderedQuery;
use crate::query::error::QuerierError;

pub use model::QueryValue;
pub use prometheus::PrometheusClient;

/// Evaluation window for range queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

/// A monitoring backend that evaluates rendered queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Evaluate `query` at a single instant
    async fn instant_query(
        &self,
        query: &RenderedQuery,
        at: DateTime<Utc>,
    ) -> Result<QueryValue, QuerierError>;

    /// Evaluate `query` over `range`
    async fn range_query(
        &self,
        query: &RenderedQuery,
        range: TimeRange,
    ) -> Result<QueryValue, QuerierError>;
}
