use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::config::BackendConfig;
use reqwest::StatusCode;

use super::model::{ApiResponse, QueryValue};
use super::{MetricsBackend, TimeRange};
use crate::query::RenderedQuery;
use crate::query::error::QuerierError;

/// Client for the Prometheus HTTP query API
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PrometheusClient {
    pub fn new(config: &BackendConfig) -> Result<Self, QuerierError> {
        let url = url::Url::parse(&config.url).map_err(|e| {
            QuerierError::BackendUnavailable(format!("invalid backend URL '{}': {e}", config.url))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                QuerierError::BackendUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: url.as_str().trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{path}", self.base_url)
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<QueryValue, QuerierError> {
        let url = self.endpoint(path);
        log::debug!("GET {url} {params:?}");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        decode_response(status, &body)
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> QuerierError {
        if err.is_timeout() {
            QuerierError::BackendUnavailable(format!(
                "request to {url} timed out after {:?}",
                self.timeout
            ))
        } else {
            QuerierError::BackendUnavailable(format!("request to {url} failed: {err}"))
        }
    }
}

#[async_trait]
impl MetricsBackend for PrometheusClient {
    async fn instant_query(
        &self,
        query: &RenderedQuery,
        at: DateTime<Utc>,
    ) -> Result<QueryValue, QuerierError> {
        self.get(
            "query",
            &[
                ("query", query.to_string()),
                ("time", format_timestamp(at)),
            ],
        )
        .await
    }

    async fn range_query(
        &self,
        query: &RenderedQuery,
        range: TimeRange,
    ) -> Result<QueryValue, QuerierError> {
        self.get(
            "query_range",
            &[
                ("query", query.to_string()),
                ("start", format_timestamp(range.start)),
                ("end", format_timestamp(range.end)),
                ("step", range.step.as_secs_f64().to_string()),
            ],
        )
        .await
    }
}

/// Unix seconds with millisecond precision
fn format_timestamp(at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis();
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}

fn decode_response(status: StatusCode, body: &str) -> Result<QueryValue, QuerierError> {
    let response: ApiResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) if status.is_success() => {
            return Err(QuerierError::malformed(format!(
                "undecodable backend response: {e}"
            )));
        }
        Err(_) => {
            return Err(QuerierError::BackendUnavailable(format!(
                "backend answered with HTTP {status}"
            )));
        }
    };

    for warning in &response.warnings {
        log::warn!("Backend warning: {warning}");
    }

    response.into_value()
}
