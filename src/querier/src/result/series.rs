use serde::Serialize;

/// One point of a series, kept in the backend's textual form
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    value: String,
    timestamp: String,
    at: f64,
}

impl Sample {
    /// `at` is the numeric form of `timestamp`, used for ordering
    pub fn new(value: impl Into<String>, timestamp: impl Into<String>, at: f64) -> Self {
        Self {
            value: value.into(),
            timestamp: timestamp.into(),
            at,
        }
    }
}

/// A labeled series with parallel value and timestamp columns.
///
/// Both columns always have the same length and are ordered by increasing
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    label: String,
    values: Vec<String>,
    timestamps: Vec<String>,
}

impl Series {
    pub fn from_samples(label: impl Into<String>, mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| a.at.total_cmp(&b.at));

        let (values, timestamps) = samples
            .into_iter()
            .map(|sample| (sample.value, sample.timestamp))
            .unzip();

        Self {
            label: label.into(),
            values,
            timestamps,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
