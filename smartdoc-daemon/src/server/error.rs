//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use smartdoc_core::CoreError;
use tracing::{error, warn};

/// Message returned for unknown, deleted or evicted sessions.
pub const SESSION_NOT_FOUND: &str = "Session not found. Please upload a document first.";

/// Errors returned by handlers, rendered as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The answer backend failed
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedFormat { .. } | CoreError::Extraction { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::SessionNotFound(_) => ApiError::NotFound(SESSION_NOT_FOUND.to_string()),
            CoreError::Generation(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(msg) => error!("Internal error: {}", msg),
            ApiError::BadGateway(msg) => warn!("Backend error: {}", msg),
            _ => {}
        }
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
