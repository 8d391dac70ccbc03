//! Text generation: the provider seam, prompt templates and the
//! emergency-marker convention applied to generated replies.

pub mod error;
pub mod prompt;
pub mod provider;
pub mod sentinel;

pub use error::GenerationError;
pub use prompt::{compose_chat_prompt, compose_summary_prompt, PromptConfig};
pub use provider::{GenerationResult, TextGenerator};
pub use sentinel::{is_emergency_trigger, EMERGENCY_MARKER};
