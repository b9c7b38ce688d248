pub mod parser;
pub mod policy;
pub mod series;

pub use parser::ResultParser;
pub use policy::ParsePolicy;
pub use series::Series;

/// Unparsed textual response from the backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResult(String);

impl RawResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawResult {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawResult {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}
