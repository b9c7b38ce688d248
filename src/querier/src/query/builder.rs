//! Renders the three fixed query templates.

use common::catalog::is_valid_metric_name;

use super::RenderedQuery;
use super::error::QuerierError;
use super::family::QueryFamily;
use super::promql::parser;
use super::request::{QueryRequest, normalize_duration};

/// Render the query for `req`.
///
/// Fails with [`QuerierError::InvalidRequest`] when a parameter the family
/// needs is missing, empty or out of range. The rendered expression is
/// checked against the PromQL grammar before it is returned.
pub fn render(req: &QueryRequest) -> Result<RenderedQuery, QuerierError> {
    let metric = req.metric.trim();
    if metric.is_empty() {
        return Err(QuerierError::invalid_request("metric is required"));
    }
    if !is_valid_metric_name(metric) {
        return Err(QuerierError::invalid_request(format!(
            "'{metric}' is not a valid metric name"
        )));
    }

    let query = match req.family {
        QueryFamily::Count => format!("count(count by (bridge, port)({metric}))"),
        QueryFamily::TopKRate => {
            let duration = required_duration(req)?;
            let rank = required_rank(req)?;
            format!("topk({rank}, avg by (bridge, port)(rate({metric}[{duration}])*8))")
        }
        QueryFamily::GroupAverageRate => {
            let duration = required_duration(req)?;
            format!("avg by (bridge, port)(rate({metric}[{duration}])*8)")
        }
    };

    check_rendered(&query, metric, req.family)?;
    log::debug!("Rendered {} query: {query}", req.family);

    Ok(RenderedQuery::new(query))
}

fn required_duration(req: &QueryRequest) -> Result<String, QuerierError> {
    match req.duration.as_deref() {
        Some(duration) => normalize_duration(duration),
        None => Err(QuerierError::invalid_request(format!(
            "duration is required for {}",
            req.family
        ))),
    }
}

fn required_rank(req: &QueryRequest) -> Result<i64, QuerierError> {
    match req.rank {
        Some(rank) if rank > 0 => Ok(rank),
        Some(rank) => Err(QuerierError::invalid_request(format!(
            "rank must be a positive integer, got {rank}"
        ))),
        None => Err(QuerierError::invalid_request(format!(
            "rank is required for {}",
            req.family
        ))),
    }
}

fn check_rendered(query: &str, metric: &str, family: QueryFamily) -> Result<(), QuerierError> {
    let expr = parser::parse(query)?;

    let names = parser::selected_metrics(&expr);
    if names != [metric] {
        return Err(QuerierError::invalid_request(format!(
            "query '{query}' selects {names:?} instead of '{metric}'"
        )));
    }

    let zero_range = parser::range_duration(&expr).is_none_or(|range| range.is_zero());
    if family.requires_duration() && zero_range {
        return Err(QuerierError::invalid_request("duration must be greater than zero"));
    }

    Ok(())
}
