//! Query templating, backend transport and result normalization for OVS
//! metrics.
//!
//! A request flows through [`query::builder::render`], a [`backend::MetricsBackend`]
//! and the [`result::ResultParser`]; [`MetricsQuerier`] wires the three together.

pub mod backend;
pub mod query;
pub mod result;
pub mod service;

pub use query::error::QuerierError;
pub use query::family::QueryFamily;
pub use query::request::QueryRequest;
pub use result::series::Series;
pub use service::MetricsQuerier;
