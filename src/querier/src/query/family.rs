use std::fmt;
use std::str::FromStr;

use super::error::QuerierError;

/// The three query shapes the gateway knows how to render and parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFamily {
    /// Number of distinct (bridge, port) series of a metric
    Count,
    /// Highest `rank` (bridge, port) pairs by averaged rate
    TopKRate,
    /// Averaged rate per (bridge, port) over the lookback window
    GroupAverageRate,
}

/// How the backend evaluates a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Instant,
    Range,
}

impl QueryFamily {
    pub const ALL: [QueryFamily; 3] = [Self::Count, Self::TopKRate, Self::GroupAverageRate];

    /// Name used in REST routes
    pub fn route_name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::TopKRate => "topk",
            Self::GroupAverageRate => "groupby",
        }
    }

    pub fn evaluation(&self) -> Evaluation {
        match self {
            Self::Count | Self::TopKRate => Evaluation::Instant,
            Self::GroupAverageRate => Evaluation::Range,
        }
    }

    pub fn requires_duration(&self) -> bool {
        matches!(self, Self::TopKRate | Self::GroupAverageRate)
    }

    pub fn requires_rank(&self) -> bool {
        matches!(self, Self::TopKRate)
    }
}

impl fmt::Display for QueryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Count => "Count",
            Self::TopKRate => "TopKRate",
            Self::GroupAverageRate => "GroupAverageRate",
        };
        f.write_str(name)
    }
}

impl FromStr for QueryFamily {
    type Err = QuerierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" | "Count" => Ok(Self::Count),
            "topk" | "TopKRate" => Ok(Self::TopKRate),
            "groupby" | "GroupAverageRate" => Ok(Self::GroupAverageRate),
            other => Err(QuerierError::UnknownFamily(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_and_canonical_names() {
        for family in QueryFamily::ALL {
            assert_eq!(family.route_name().parse::<QueryFamily>().unwrap(), family);
            assert_eq!(family.to_string().parse::<QueryFamily>().unwrap(), family);
        }
    }

    #[test]
    fn test_unknown_family() {
        assert_eq!(
            "histogram".parse::<QueryFamily>(),
            Err(QuerierError::UnknownFamily("histogram".to_string()))
        );
        // names are case sensitive
        assert!("TOPK".parse::<QueryFamily>().is_err());
    }

    #[test]
    fn test_evaluation_kind() {
        assert_eq!(QueryFamily::Count.evaluation(), Evaluation::Instant);
        assert_eq!(QueryFamily::TopKRate.evaluation(), Evaluation::Instant);
        assert_eq!(QueryFamily::GroupAverageRate.evaluation(), Evaluation::Range);
    }

    #[test]
    fn test_required_parameters() {
        assert!(!QueryFamily::Count.requires_duration());
        assert!(!QueryFamily::Count.requires_rank());
        assert!(QueryFamily::TopKRate.requires_duration());
        assert!(QueryFamily::TopKRate.requires_rank());
        assert!(QueryFamily::GroupAverageRate.requires_duration());
        assert!(!QueryFamily::GroupAverageRate.requires_rank());
    }
}
