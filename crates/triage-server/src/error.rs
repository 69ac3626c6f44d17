use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use triage_core::TriageError;

/// Error body returned on every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Request failure with its HTTP status mapping.
#[derive(Debug)]
pub struct ApiError(pub TriageError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            TriageError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TriageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.0 {
            TriageError::InvalidInput(detail) => {
                tracing::warn!(detail, "request rejected");
            }
            TriageError::Internal(detail) => {
                tracing::error!(detail, "processing failed");
            }
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
