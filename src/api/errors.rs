use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::cache::LazyCacheError;
use crate::application::errors::{AssessmentUseCaseError, OutcomeUseCaseError, ReportUseCaseError};
use crate::application::ports::LockError;

/// API error response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
        }));

        (self.status, body).into_response()
    }
}

// Convert use case errors to API errors

impl From<LazyCacheError> for ApiError {
    fn from(err: LazyCacheError) -> Self {
        error!("Cached query failed: {}", err);
        match err {
            LazyCacheError::Lock(LockError::Timeout { .. }) => {
                ApiError::unavailable("Result is being computed, retry later")
            }
            LazyCacheError::Query(_) => ApiError::internal_error("Query failed"),
            _ => ApiError::internal_error("Cache error"),
        }
    }
}

impl From<AssessmentUseCaseError> for ApiError {
    fn from(err: AssessmentUseCaseError) -> Self {
        match err {
            AssessmentUseCaseError::NotFound(id) => {
                ApiError::not_found(format!("Assessment not found: {}", id))
            }
            AssessmentUseCaseError::InvalidRequest(msg) => ApiError::bad_request(msg),
            AssessmentUseCaseError::Domain(e) => ApiError::bad_request(e.to_string()),
            AssessmentUseCaseError::Cache(e) => e.into(),
            AssessmentUseCaseError::Repository(e) => {
                error!("Repository error: {}", e);
                ApiError::internal_error("Repository error")
            }
        }
    }
}

impl From<OutcomeUseCaseError> for ApiError {
    fn from(err: OutcomeUseCaseError) -> Self {
        match err {
            OutcomeUseCaseError::InvalidRequest(msg) => ApiError::bad_request(msg),
            OutcomeUseCaseError::Domain(e) => ApiError::bad_request(e.to_string()),
            OutcomeUseCaseError::Cache(e) => e.into(),
        }
    }
}

impl From<ReportUseCaseError> for ApiError {
    fn from(err: ReportUseCaseError) -> Self {
        match err {
            ReportUseCaseError::Domain(e) => ApiError::bad_request(e.to_string()),
            ReportUseCaseError::Cache(e) => e.into(),
        }
    }
}
