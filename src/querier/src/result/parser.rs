use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::RawResult;
use super::policy::{ASSOCIATION, Layout, ParsePolicy, SAMPLE_STRIP};
use super::series::{Sample, Series};
use crate::query::error::QuerierError;
use crate::query::family::QueryFamily;

/// Turns the backend's textual result into labeled series
#[derive(Debug, Clone, Copy)]
pub struct ResultParser {
    policy: ParsePolicy,
}

impl ResultParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    pub fn for_family(family: QueryFamily) -> Self {
        Self::new(ParsePolicy::for_family(family))
    }

    /// Look up the policy by family name, failing with `UnknownFamily`
    pub fn for_family_name(name: &str) -> Result<Self, QuerierError> {
        Ok(Self::for_family(name.parse()?))
    }

    pub fn policy(&self) -> &ParsePolicy {
        &self.policy
    }

    pub fn parse(&self, raw: &RawResult) -> Result<Vec<Series>, QuerierError> {
        let text = raw.as_str();
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        match self.policy.layout {
            Layout::SingleAssociation => {
                let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
                let (Some(line), None) = (lines.next(), lines.next()) else {
                    return Err(QuerierError::malformed(format!(
                        "expected a single association, got '{text}'"
                    )));
                };
                Ok(vec![self.association(line)?])
            }
            Layout::AssociationPerLine => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| self.association(line))
                .collect(),
            Layout::LabelBlocks => self.label_blocks(text),
        }
    }

    fn association(&self, text: &str) -> Result<Series, QuerierError> {
        let (lhs, rhs) = text.split_once(ASSOCIATION).ok_or_else(|| {
            QuerierError::malformed(format!("expected '{ASSOCIATION}' in '{text}'"))
        })?;

        let label = match self.policy.fixed_label {
            Some(label) => label.to_string(),
            None => self.policy.clean_label(lhs),
        };

        let sample = split_sample(rhs)?.ok_or_else(|| {
            QuerierError::malformed(format!("no value and timestamp for '{label}' in '{text}'"))
        })?;

        log::trace!("Parsed association {label} => {sample:?}");
        Ok(Series::from_samples(label, vec![sample]))
    }

    fn label_blocks(&self, text: &str) -> Result<Vec<Series>, QuerierError> {
        let mut order: Vec<String> = Vec::new();
        let mut samples: HashMap<String, Vec<Sample>> = HashMap::new();
        let mut current: Option<String> = None;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if is_label_line(line) {
                let label = self.policy.clean_label(line);
                log::trace!("Label set '{label}'");

                match samples.entry(label.clone()) {
                    // a repeated label set starts over but keeps its position
                    Entry::Occupied(entry) => entry.into_mut().clear(),
                    Entry::Vacant(entry) => {
                        order.push(label.clone());
                        entry.insert(Vec::new());
                    }
                }
                current = Some(label);
                continue;
            }

            let Some(sample) = split_sample(line)? else {
                log::trace!("Discarding line '{line}'");
                continue;
            };

            let Some(label) = current.as_ref() else {
                return Err(QuerierError::malformed(format!(
                    "sample '{line}' appears before any label set"
                )));
            };

            log::trace!("Sample for '{label}': {sample:?}");
            samples.entry(label.clone()).or_default().push(sample);
        }

        Ok(order
            .into_iter()
            .map(|label| {
                let points = samples.remove(&label).unwrap_or_default();
                Series::from_samples(label, points)
            })
            .collect())
    }
}

/// A label set line: `{...} =>`, or a bare metric name followed by `=>`
fn is_label_line(line: &str) -> bool {
    line.contains('{')
        || line
            .strip_suffix(ASSOCIATION)
            .is_some_and(|name| !name.trim().is_empty())
}

/// Sanitize `value @[timestamp]` and split it into a sample.
///
/// `Ok(None)` means the text held fewer than two tokens. More than two is
/// an error since a line never carries more than one sample.
fn split_sample(text: &str) -> Result<Option<Sample>, QuerierError> {
    let cleaned: String = text.chars().filter(|c| !SAMPLE_STRIP.contains(c)).collect();
    let mut tokens = cleaned.split_whitespace();

    let (Some(value), Some(timestamp)) = (tokens.next(), tokens.next()) else {
        return Ok(None);
    };
    if tokens.next().is_some() {
        return Err(QuerierError::malformed(format!(
            "more than one sample in '{text}'"
        )));
    }

    let at: f64 = timestamp.parse().map_err(|_| {
        QuerierError::malformed(format!("timestamp '{timestamp}' is not numeric"))
    })?;

    Ok(Some(Sample::new(value, timestamp, at)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(family: QueryFamily, text: &str) -> Result<Vec<Series>, QuerierError> {
        ResultParser::for_family(family).parse(&RawResult::from(text))
    }

    #[test]
    fn test_count_single_series() {
        let series = parse(QueryFamily::Count, "{} => 12 @[1699999999.5]").unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label(), "count");
        assert_eq!(series[0].values(), ["12"]);
        assert_eq!(series[0].timestamps(), ["1699999999.5"]);
    }

    #[test]
    fn test_count_missing_association() {
        assert!(matches!(
            parse(QueryFamily::Count, "12 @[1699999999]"),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_count_missing_value() {
        assert!(matches!(
            parse(QueryFamily::Count, "{} => @[1699999999]"),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_count_rejects_second_association() {
        for text in ["{} => 4 @[1]\n{} => 5 @[2]", "{} => 4 @[1] {} => 5 @[2]"] {
            assert!(matches!(
                parse(QueryFamily::Count, text),
                Err(QuerierError::MalformedResult(_))
            ));
        }
    }

    #[test]
    fn test_top_k_line() {
        let series = parse(QueryFamily::TopKRate, "br0,eth0 => 1024 @[1699999999]").unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label(), "br0,eth0");
        assert_eq!(series[0].values(), ["1024"]);
        assert_eq!(series[0].timestamps(), ["1699999999"]);
    }

    #[test]
    fn test_top_k_one_series_per_line() {
        let text = "{bridge=\"br0\", port=\"eth0\"} => 2048 @[1699999999]\n\
                    {bridge=\"br0\", port=\"eth1\"} => 1024 @[1699999999]\n\
                    {bridge=\"br1\", port=\"eth0\"} => 512 @[1699999999]";
        let series = parse(QueryFamily::TopKRate, text).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].label(), "bridge=\"br0\", port=\"eth0\"");
        assert_eq!(series[2].values(), ["512"]);
        assert!(series.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn test_top_k_short_right_side() {
        assert!(matches!(
            parse(QueryFamily::TopKRate, "br0,eth0 => 1024"),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_top_k_rejects_multiple_samples_on_a_line() {
        assert!(matches!(
            parse(QueryFamily::TopKRate, "br0 => 1 @[1] 2 @[2]"),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_group_average_blocks() {
        let text = "{bridge=\"br0\", port=\"eth0\"} =>\n\
                    10 @[1700000000]\n\
                    20 @[1700000060]\n\
                    30 @[1700000120]\n\
                    {bridge=\"br0\", port=\"eth1\"} =>\n\
                    5 @[1700000000]";
        let series = parse(QueryFamily::GroupAverageRate, text).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label(), "bridge=\"br0\", port=\"eth0\"");
        assert_eq!(series[0].values(), ["10", "20", "30"]);
        assert_eq!(
            series[0].timestamps(),
            ["1700000000", "1700000060", "1700000120"]
        );
        assert_eq!(series[1].len(), 1);
    }

    #[test]
    fn test_group_average_timestamps_non_decreasing() {
        let text = "{bridge=\"br0\", port=\"eth0\"} =>\n\
                    30 @[1700000120]\n\
                    10 @[1700000000]\n\
                    20 @[1700000060]";
        let series = parse(QueryFamily::GroupAverageRate, text).unwrap();

        let ts: Vec<f64> = series[0]
            .timestamps()
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        assert!(ts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(series[0].values(), ["10", "20", "30"]);
    }

    #[test]
    fn test_group_average_discards_short_lines() {
        let text = "=>\n{bridge=\"br0\", port=\"eth0\"} =>\n7\n10 @[1700000000]";
        let series = parse(QueryFamily::GroupAverageRate, text).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].values(), ["10"]);
    }

    #[test]
    fn test_group_average_empty_block_keeps_position() {
        let text = "{a=\"1\"} =>\n{b=\"2\"} =>\n2 @[1]";
        let series = parse(QueryFamily::GroupAverageRate, text).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label(), "a=\"1\"");
        assert!(series[0].is_empty());
        assert_eq!(series[0].values().len(), 0);
        assert_eq!(series[0].timestamps().len(), 0);
        assert_eq!(series[1].values(), ["2"]);
    }

    #[test]
    fn test_group_average_bare_metric_label() {
        let text = "up =>\n1 @[1700000000]\n2 @[1700000060]";
        let series = parse(QueryFamily::GroupAverageRate, text).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label(), "up");
        assert_eq!(series[0].values(), ["1", "2"]);
    }

    #[test]
    fn test_group_average_rejects_multiple_samples_on_a_line() {
        assert!(matches!(
            parse(QueryFamily::GroupAverageRate, "{} =>\n1 @[1] 2 @[2]"),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_group_average_sample_before_label() {
        assert!(matches!(
            parse(QueryFamily::GroupAverageRate, "10 @[1700000000]\n{} =>"),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_group_average_repeated_label_starts_over() {
        let text = "{a=\"1\"} =>\n1 @[1]\n{b=\"2\"} =>\n2 @[1]\n{a=\"1\"} =>\n3 @[2]";
        let series = parse(QueryFamily::GroupAverageRate, text).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label(), "a=\"1\"");
        assert_eq!(series[0].values(), ["3"]);
        assert_eq!(series[1].values(), ["2"]);
    }

    #[test]
    fn test_non_numeric_timestamp() {
        assert!(matches!(
            parse(QueryFamily::TopKRate, "br0 => 1 @[yesterday]"),
            Err(QuerierError::MalformedResult(_))
        ));
        assert!(matches!(
            parse(QueryFamily::GroupAverageRate, "{} =>\n1 @[soon]"),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_empty_input_yields_no_series() {
        for family in QueryFamily::ALL {
            assert!(parse(family, "").unwrap().is_empty());
            assert!(parse(family, "  \n\t\n").unwrap().is_empty());
        }
    }

    #[test]
    fn test_parser_by_family_name() {
        assert_eq!(
            ResultParser::for_family_name("groupby").unwrap().policy().layout,
            Layout::LabelBlocks
        );
        assert!(matches!(
            ResultParser::for_family_name("sum"),
            Err(QuerierError::UnknownFamily(_))
        ));
    }
}
