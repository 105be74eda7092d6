//! Fixed Amazon Polly synthesis settings.
//!
//! Every reply uses the same voice: Ruth on the neural engine, MP3 at 16 kHz.

use aws_sdk_polly::types::{Engine, OutputFormat};

/// Polly voice ID for replies.
pub const VOICE_ID: &str = "Ruth";

/// Output sample rate in Hz, as the API expects it.
pub const SAMPLE_RATE: &str = "16000";

/// MIME type of the synthesized clip.
pub const CONTENT_TYPE: &str = "audio/mpeg";

/// Maximum text length for the SynthesizeSpeech API (characters).
pub const MAX_TEXT_LENGTH: usize = 3000;

#[inline]
pub(super) fn engine() -> Engine {
    Engine::Neural
}

#[inline]
pub(super) fn output_format() -> OutputFormat {
    OutputFormat::Mp3
}
