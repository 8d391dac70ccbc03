use axum::{extract::rejection::JsonRejection, Json};

use crate::error::AppError;

/// Unwrap a JSON body, turning any extractor rejection into a validation error.
pub fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// Reject blank input before any external call.
pub fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("`{}` must not be empty", field)));
    }
    Ok(())
}
