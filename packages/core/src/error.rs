use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::alerts::DispatchError;
use crate::generation::GenerationError;

/// Unified application error.
///
/// Every handler failure ends up here and leaves the service as a JSON
/// `{"detail": ...}` body, so callers never see a bare disconnect.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_) | AppError::Generation(_) | AppError::Delivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err.to_string())
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::MissingConfig(msg) => AppError::Config(msg),
            DispatchError::InvalidAddress(msg) => {
                AppError::Validation(format!("invalid email address: {}", msg))
            }
            other => AppError::Delivery(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
