pub mod builder;
pub mod error;
pub mod family;
pub mod promql;
pub mod request;

use std::fmt;

/// A rendered query expression, passed to the backend verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery(String);

impl RenderedQuery {
    pub(crate) fn new(query: String) -> Self {
        Self(query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
