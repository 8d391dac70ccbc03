//! HTTP surface: shared state, router assembly and request handlers.
//!
//! Routes:
//! - `POST /chat`            persona reply from the generation client
//! - `POST /summarize`       short doctor note from a chat history
//! - `POST /emergency-email` hospital alert through the mail dispatcher
//! - `GET  /`                status and transport configuration
//! - `GET  /health`          plain liveness probe
//! - `GET  /metrics`         Prometheus exposition

pub mod chat;
pub mod emergency;
pub mod extract;
pub mod health;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::alerts::{build_dispatcher, MailDispatcher};
use crate::config::Config;
use crate::error::AppError;
use crate::generation::{PromptConfig, TextGenerator};
use crate::metrics::{metrics_handler, track_http, AppMetrics};
use crate::services::gemini::GeminiClient;

/// Everything a handler may touch. Built once at startup, read-only after.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator + Send + Sync>,
    pub mailer: Arc<dyn MailDispatcher + Send + Sync>,
    pub prompts: Arc<PromptConfig>,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let generator = GeminiClient::new(&config.generation)
            .map_err(|err| AppError::Config(format!("generation client: {}", err)))?;
        let mailer = build_dispatcher(&config.mail)
            .map_err(|err| AppError::Config(format!("mail dispatcher: {}", err)))?;
        let metrics = AppMetrics::new()
            .map_err(|err| AppError::Config(format!("metrics registry: {}", err)))?;

        Ok(Self {
            generator: Arc::new(generator),
            mailer,
            prompts: Arc::new(PromptConfig::with_word_limit(config.summary_word_limit)),
            metrics: Arc::new(metrics),
        })
    }
}

impl FromRef<AppState> for Arc<AppMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

/// Any origin, method and header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::status))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_handler))
        .route("/chat", post(chat::chat))
        .route("/summarize", post(chat::summarize))
        .route("/emergency-email", post(emergency::emergency_email))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_http,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
