//! Prometheus HTTP API response model.
//!
//! `QueryValue` renders itself in the text form the Prometheus Go client
//! prints, which is what [`crate::result::ResultParser`] consumes.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::query::error::QuerierError;

const METRIC_NAME_LABEL: &str = "__name__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// `{status, data, errorType, error, warnings}` envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub data: Option<QueryValue>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ApiResponse {
    pub fn into_value(self) -> Result<QueryValue, QuerierError> {
        match self.status {
            ApiStatus::Success => self.data.ok_or_else(|| {
                QuerierError::malformed("backend reported success without data")
            }),
            ApiStatus::Error => Err(QuerierError::BackendRejected {
                error_type: self.error_type.unwrap_or_else(|| "unknown".to_string()),
                message: self.error.unwrap_or_default(),
            }),
        }
    }
}

/// `[<unix seconds>, "<value>"]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SamplePair(pub f64, pub String);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VectorSample {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    pub value: SamplePair,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatrixSeries {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    #[serde(default)]
    pub values: Vec<SamplePair>,
}

/// The `data` member of a query response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryValue {
    Scalar(SamplePair),
    String(SamplePair),
    Vector(Vec<VectorSample>),
    Matrix(Vec<MatrixSeries>),
}

impl QueryValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::String(_) => "string",
            Self::Vector(_) => "vector",
            Self::Matrix(_) => "matrix",
        }
    }
}

impl fmt::Display for SamplePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @[{}]", self.1, self.0)
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(pair) => write!(f, "scalar: {pair}"),
            Self::String(pair) => write!(f, "{pair}"),
            Self::Vector(samples) => {
                let lines: Vec<String> = samples
                    .iter()
                    .map(|s| format!("{} => {}", format_metric(&s.metric), s.value))
                    .collect();
                f.write_str(&lines.join("\n"))
            }
            Self::Matrix(series) => {
                let blocks: Vec<String> = series
                    .iter()
                    .map(|s| {
                        let mut lines = vec![format!("{} =>", format_metric(&s.metric))];
                        lines.extend(s.values.iter().map(SamplePair::to_string));
                        lines.join("\n")
                    })
                    .collect();
                f.write_str(&blocks.join("\n"))
            }
        }
    }
}

/// `name{a="1", b="2"}`; labels sorted, `__name__` in front
pub fn format_metric(metric: &BTreeMap<String, String>) -> String {
    let name = metric.get(METRIC_NAME_LABEL);
    let labels: Vec<String> = metric
        .iter()
        .filter(|(key, _)| key.as_str() != METRIC_NAME_LABEL)
        .map(|(key, value)| format!("{key}={value:?}"))
        .collect();

    match (name, labels.is_empty()) {
        (Some(name), true) => name.clone(),
        (None, true) => "{}".to_string(),
        (name, false) => format!(
            "{}{{{}}}",
            name.map(String::as_str).unwrap_or_default(),
            labels.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> QueryValue {
        serde_json::from_str::<ApiResponse>(json)
            .unwrap()
            .into_value()
            .unwrap()
    }

    #[test]
    fn test_vector_renders_one_line_per_sample() {
        let value = decode(
            r#"{"status":"success","data":{"resultType":"vector","result":[
                {"metric":{"port":"eth0","bridge":"br0"},"value":[1699999999,"2048"]},
                {"metric":{"bridge":"br0","port":"eth1"},"value":[1699999999.25,"1024"]}
            ]}}"#,
        );

        assert_eq!(value.kind(), "vector");
        assert_eq!(
            value.to_string(),
            "{bridge=\"br0\", port=\"eth0\"} => 2048 @[1699999999]\n\
             {bridge=\"br0\", port=\"eth1\"} => 1024 @[1699999999.25]"
        );
    }

    #[test]
    fn test_empty_label_set() {
        let value = decode(
            r#"{"status":"success","data":{"resultType":"vector","result":[
                {"metric":{},"value":[1699999999,"4"]}
            ]}}"#,
        );
        assert_eq!(value.to_string(), "{} => 4 @[1699999999]");
    }

    #[test]
    fn test_matrix_renders_blocks() {
        let value = decode(
            r#"{"status":"success","data":{"resultType":"matrix","result":[
                {"metric":{"bridge":"br0","port":"eth0"},"values":[[1700000000,"1"],[1700000060,"2"]]},
                {"metric":{"bridge":"br1","port":"eth0"},"values":[[1700000000,"3"]]}
            ]}}"#,
        );

        assert_eq!(
            value.to_string(),
            "{bridge=\"br0\", port=\"eth0\"} =>\n1 @[1700000000]\n2 @[1700000060]\n\
             {bridge=\"br1\", port=\"eth0\"} =>\n3 @[1700000000]"
        );
    }

    #[test]
    fn test_scalar_and_string() {
        let scalar = decode(r#"{"status":"success","data":{"resultType":"scalar","result":[1.5,"7"]}}"#);
        assert_eq!(scalar.to_string(), "scalar: 7 @[1.5]");

        let string = decode(r#"{"status":"success","data":{"resultType":"string","result":[2,"up"]}}"#);
        assert_eq!(string.to_string(), "up @[2]");
    }

    #[test]
    fn test_metric_name_in_front() {
        let mut metric = BTreeMap::new();
        metric.insert("__name__".to_string(), "ovs_flow_flow_bytes_total".to_string());
        assert_eq!(format_metric(&metric), "ovs_flow_flow_bytes_total");

        metric.insert("bridge".to_string(), "br0".to_string());
        assert_eq!(
            format_metric(&metric),
            "ovs_flow_flow_bytes_total{bridge=\"br0\"}"
        );
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"status":"error","errorType":"bad_data","error":"parse error at char 5"}"#,
        )
        .unwrap();

        assert_eq!(
            response.into_value(),
            Err(QuerierError::BackendRejected {
                error_type: "bad_data".to_string(),
                message: "parse error at char 5".to_string(),
            })
        );
    }

    #[test]
    fn test_success_without_data() {
        let response: ApiResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(matches!(
            response.into_value(),
            Err(QuerierError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_warnings_are_decoded() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"status":"success","warnings":["partial response"],"data":{"resultType":"vector","result":[]}}"#,
        )
        .unwrap();
        assert_eq!(response.warnings, vec!["partial response"]);
        assert_eq!(response.into_value().unwrap().to_string(), "");
    }
}
