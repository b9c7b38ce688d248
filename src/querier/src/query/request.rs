use super::error::QuerierError;
use super::family::QueryFamily;

/// Parameters for one templated query.
///
/// Parameters the family does not use are ignored when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub family: QueryFamily,
    pub metric: String,
    pub duration: Option<String>,
    pub rank: Option<i64>,
}

impl QueryRequest {
    pub fn count(metric: impl Into<String>) -> Self {
        Self {
            family: QueryFamily::Count,
            metric: metric.into(),
            duration: None,
            rank: None,
        }
    }

    pub fn top_k(metric: impl Into<String>, duration: impl Into<String>, rank: i64) -> Self {
        Self {
            family: QueryFamily::TopKRate,
            metric: metric.into(),
            duration: Some(duration.into()),
            rank: Some(rank),
        }
    }

    pub fn group_average(metric: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            family: QueryFamily::GroupAverageRate,
            metric: metric.into(),
            duration: Some(duration.into()),
            rank: None,
        }
    }
}

const DURATION_UNITS: [&str; 7] = ["ms", "s", "m", "h", "d", "w", "y"];

/// Normalize a range duration into a backend duration literal.
///
/// Accepts literals such as `5m`, `1h30m` or `500ms`. A bare integer is taken
/// as seconds and rewritten to `<n>s`.
pub fn normalize_duration(duration: &str) -> Result<String, QuerierError> {
    let duration = duration.trim();
    if duration.is_empty() {
        return Err(QuerierError::invalid_request("duration is required"));
    }

    if duration.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(format!("{duration}s"));
    }

    if is_duration_literal(duration) {
        Ok(duration.to_string())
    } else {
        Err(QuerierError::invalid_request(format!(
            "'{duration}' is not a valid duration"
        )))
    }
}

fn is_duration_literal(s: &str) -> bool {
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];

        // "ms" has to be tried before "m"
        match DURATION_UNITS.iter().find(|unit| rest.starts_with(*unit)) {
            Some(unit) => rest = &rest[unit.len()..],
            None => return false,
        }
    }
    true
}
