use std::sync::Arc;

use chrono::Utc;
use common::config::RangeConfig;

use crate::backend::{MetricsBackend, QueryValue, TimeRange};
use crate::query::RenderedQuery;
use crate::query::builder;
use crate::query::error::QuerierError;
use crate::query::family::{Evaluation, QueryFamily};
use crate::query::request::QueryRequest;
use crate::result::{RawResult, ResultParser, Series};

/// Render, evaluate and normalize templated queries
#[derive(Clone)]
pub struct MetricsQuerier {
    backend: Arc<dyn MetricsBackend>,
    range: RangeConfig,
}

impl MetricsQuerier {
    pub fn new(backend: Arc<dyn MetricsBackend>, range: RangeConfig) -> Self {
        Self { backend, range }
    }

    #[tracing::instrument(skip(self), fields(family = %request.family, metric = %request.metric))]
    pub async fn execute(&self, request: &QueryRequest) -> Result<Vec<Series>, QuerierError> {
        let query = builder::render(request)?;
        let value = self.evaluate(request.family, &query).await?;

        let raw = RawResult::from(value.to_string());
        log::trace!("Raw {} result:\n{}", value.kind(), raw.as_str());

        let series = ResultParser::for_family(request.family).parse(&raw)?;
        log::debug!("Query returned {} series", series.len());
        Ok(series)
    }

    async fn evaluate(
        &self,
        family: QueryFamily,
        query: &RenderedQuery,
    ) -> Result<QueryValue, QuerierError> {
        let now = Utc::now();

        match family.evaluation() {
            Evaluation::Instant => self.backend.instant_query(query, now).await,
            Evaluation::Range => {
                let lookback = chrono::Duration::from_std(self.range.lookback).map_err(|e| {
                    QuerierError::invalid_request(format!("range lookback out of bounds: {e}"))
                })?;
                let range = TimeRange {
                    start: now - lookback,
                    end: now,
                    step: self.range.step,
                };
                self.backend.range_query(query, range).await
            }
        }
    }
}

impl std::fmt::Debug for MetricsQuerier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsQuerier")
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}
