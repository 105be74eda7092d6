//! Text-to-speech synthesis.
//!
//! The relay answers every request with a single encoded clip, so the
//! synthesizer contract is one call per reply: text in, complete audio out.

pub mod aws_polly;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use aws_polly::AwsPollySynthesizer;

/// Errors raised while synthesizing speech.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("Nothing to synthesize")]
    EmptyText,

    #[error("Synthesis provider error: {0}")]
    ProviderError(String),

    #[error("Failed to read synthesized audio: {0}")]
    AudioStream(String),
}

pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Complete synthesized clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data: Bytes,
    /// MIME type of `data`, e.g. `audio/mpeg`
    pub content_type: &'static str,
}

impl SynthesizedAudio {
    pub fn new(data: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self {
            data: data.into(),
            content_type,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Speech synthesizer producing one clip per call.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> SynthesisResult<SynthesizedAudio>;
}
