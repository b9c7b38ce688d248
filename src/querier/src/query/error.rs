#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuerierError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Backend rejected query ({error_type}): {message}")]
    BackendRejected { error_type: String, message: String },
    #[error("Malformed result: {0}")]
    MalformedResult(String),
    #[error("Unknown query family '{0}'")]
    UnknownFamily(String),
}

impl QuerierError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResult(msg.into())
    }
}
