use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use querier::QuerierError;
use serde_json::json;

/// Error response body: `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<QuerierError> for ApiError {
    fn from(err: QuerierError) -> Self {
        let (status, step) = match &err {
            QuerierError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "building the query"),
            QuerierError::BackendUnavailable(_) | QuerierError::BackendRejected { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "querying the backend")
            }
            QuerierError::MalformedResult(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "parsing the backend result")
            }
            QuerierError::UnknownFamily(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "selecting the query family")
            }
        };

        Self {
            status,
            message: format!("Failed while {step}: {err}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{}", self.message);
        } else {
            log::warn!("{}", self.message);
        }

        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}
