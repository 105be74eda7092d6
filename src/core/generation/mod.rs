//! Text generation: transcript in, reply text out.
//!
//! The reply is read straight from the typed response and then passed through
//! [`normalize_reply`], which turns line breaks and tabs into plain spaces so
//! the text can be handed to speech synthesis as-is.

mod client;
mod config;
mod messages;

use thiserror::Error;

pub use client::{PalmTextGenerator, TextGenerator};
pub use config::{API_VERSION, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, GenerationConfig};
pub use messages::{GenerateTextRequest, GenerateTextResponse};

/// Errors raised while generating a reply.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Invalid generation configuration: {0}")]
    Configuration(String),

    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Generation response contained no candidates")]
    NoCandidates,

    #[error("Generation reply was empty")]
    EmptyReply,

    #[error("Invalid generation response: {0}")]
    InvalidResponse(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Normalize model output for speech synthesis.
///
/// Newlines, carriage returns and tabs become spaces, runs of whitespace
/// collapse to a single space, and the result is trimmed. Applying it twice
/// yields the same string as applying it once.
pub fn normalize_reply(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
