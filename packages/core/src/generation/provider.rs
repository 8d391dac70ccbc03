//! Text generation provider interface

use async_trait::async_trait;

use super::error::GenerationError;

/// Result type for a single generation call.
pub type GenerationResult = Result<String, GenerationError>;

/// A remote text-generation backend.
///
/// One call per `generate`: no retries, no fallback model.
#[async_trait]
pub trait TextGenerator {
    /// Send `prompt` and return the provider's text unmodified.
    async fn generate(&self, prompt: &str) -> GenerationResult;

    /// Model identifier, reported by the status probe.
    fn model_name(&self) -> &str;
}
