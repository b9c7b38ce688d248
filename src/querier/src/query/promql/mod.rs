//! PromQL grammar checks for rendered queries.
//!
//! Only parsing is needed here: evaluation happens in the backend.

pub mod parser;
