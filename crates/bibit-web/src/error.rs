//! Error types for the web front end

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bibit_core::BibitError;
use thiserror::Error;

/// Web error type
#[derive(Error, Debug)]
pub enum WebError {
    /// An error from the recommendation core; its kind decides the status code
    #[error(transparent)]
    Core(#[from] BibitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Core(e) if e.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Core(e) if e.is_model_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body: `{"error": "..."}`
impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type for web operations
pub type Result<T> = std::result::Result<T, WebError>;
