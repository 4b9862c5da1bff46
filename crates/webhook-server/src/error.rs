//! Error types for the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use twochat::TwoChatError;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The webhook body could not be understood.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A required request field is missing.
    #[error("{0}")]
    BadRequest(String),

    /// 2Chat rejected or failed a call.
    #[error("2Chat request failed: {0}")]
    Upstream(#[from] TwoChatError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedPayload(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::MalformedPayload(msg) => tracing::warn!("Rejected webhook: {}", msg),
            ApiError::BadRequest(msg) => tracing::debug!("Bad request: {}", msg),
            ApiError::Upstream(err) => tracing::error!("2Chat error: {}", err),
            ApiError::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::MalformedPayload("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Upstream(TwoChatError::Config("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
