//! `POST /chat` and `POST /summarize`.
//!
//! Both compose a prompt, make exactly one generation call and return the
//! provider's text untouched in `response`.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::extract::{parse_body, require_text};
use super::AppState;
use crate::error::AppError;
use crate::generation::{compose_chat_prompt, compose_summary_prompt, is_emergency_trigger};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub history: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub response: String,
}

async fn generate(state: &AppState, endpoint: &str, prompt: &str) -> Result<String, AppError> {
    let result = state.generator.generate(prompt).await;
    state.metrics.record_generation(endpoint, result.is_ok());
    Ok(result?)
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let request = parse_body(payload)?;
    require_text("message", &request.message)?;

    let prompt = compose_chat_prompt(&state.prompts.persona, &request.message);
    let reply = generate(&state, "chat", &prompt).await?;

    if is_emergency_trigger(&reply) {
        state.metrics.emergency_replies_total.inc();
        tracing::warn!("Chat reply carries the emergency marker; caller should escalate");
    }

    Ok(Json(GenerationResponse { response: reply }))
}

pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let request = parse_body(payload)?;
    require_text("history", &request.history)?;

    let prompt = compose_summary_prompt(
        &state.prompts.summary_instruction,
        state.prompts.summary_word_limit,
        &request.history,
    );
    let note = generate(&state, "summarize", &prompt).await?;

    Ok(Json(GenerationResponse { response: note }))
}
