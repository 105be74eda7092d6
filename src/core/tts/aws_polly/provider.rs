//! Amazon Polly synthesizer.
//!
//! # API Reference
//!
//! - Service: Amazon Polly
//! - Operation: SynthesizeSpeech
//! - Output: complete MP3 audio stream

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_polly::Client as PollyClient;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{TextType, VoiceId};
use tracing::{debug, error, warn};

use super::config::{CONTENT_TYPE, MAX_TEXT_LENGTH, SAMPLE_RATE, VOICE_ID, engine, output_format};
use crate::core::tts::{SpeechSynthesizer, SynthesisError, SynthesisResult, SynthesizedAudio};

/// Cut `text` to at most [`MAX_TEXT_LENGTH`] characters.
///
/// The cut always lands on a character boundary.
pub fn truncate_for_synthesis(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_LENGTH) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

// =============================================================================
// Amazon Polly Synthesizer
// =============================================================================

/// [`SpeechSynthesizer`] backed by Amazon Polly's SynthesizeSpeech API.
#[derive(Clone, Debug)]
pub struct AwsPollySynthesizer {
    client: PollyClient,
}

impl AwsPollySynthesizer {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(PollyClient::new(sdk_config))
    }

    pub fn from_client(client: PollyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechSynthesizer for AwsPollySynthesizer {
    async fn synthesize(&self, text: &str) -> SynthesisResult<SynthesizedAudio> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let input = truncate_for_synthesis(text);
        if input.len() < text.len() {
            warn!(
                original_chars = text.chars().count(),
                max_chars = MAX_TEXT_LENGTH,
                "Reply exceeds synthesis limit, truncating"
            );
        }

        debug!(
            text_len = input.len(),
            voice = VOICE_ID,
            "Synthesizing text with Amazon Polly"
        );

        let response = self
            .client
            .synthesize_speech()
            .text(input)
            .text_type(TextType::Text)
            .voice_id(VoiceId::from(VOICE_ID))
            .engine(engine())
            .output_format(output_format())
            .sample_rate(SAMPLE_RATE)
            .send()
            .await
            .map_err(|e| {
                error!(error = %DisplayErrorContext(&e), "Polly API error");
                SynthesisError::ProviderError(DisplayErrorContext(&e).to_string())
            })?;

        let audio = response.audio_stream.collect().await.map_err(|e| {
            error!(error = %e, "Failed to read audio stream");
            SynthesisError::AudioStream(e.to_string())
        })?;

        let bytes = audio.into_bytes();
        debug!(audio_bytes = bytes.len(), "Successfully synthesized audio");

        Ok(SynthesizedAudio::new(bytes, CONTENT_TYPE))
    }
}
