//! Error types for text generation

use thiserror::Error;

/// Errors surfaced by a [`TextGenerator`](super::TextGenerator).
///
/// Handlers do not branch on the variant; the rendered message is what
/// reaches the caller.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("provider response contained no text")]
    EmptyResponse,

    #[error("malformed provider response: {message}")]
    Format { message: String },
}

impl GenerationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format { message: message.into() }
    }
}
