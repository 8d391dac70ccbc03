use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::AppState;

pub const STATUS_ONLINE: &str = "Remedi System Online";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub model: String,
    pub email_transport: &'static str,
    pub email_configured: bool,
}

/// `GET /`: which transport is wired and whether it can send.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: STATUS_ONLINE,
        model: state.generator.model_name().to_string(),
        email_transport: state.mailer.transport_name(),
        email_configured: state.mailer.is_configured(),
    })
}

/// `GET /health`: liveness only, never cached.
pub async fn health() -> impl IntoResponse {
    let mut response = Response::new(Body::from("ok"));
    *response.status_mut() = StatusCode::OK;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
