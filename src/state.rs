use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::ServerConfig;
use crate::core::generation::PalmTextGenerator;
use crate::core::pipeline::VoicePipeline;
use crate::core::providers::load_sdk_config;
use crate::core::storage::AudioStore;
use crate::core::transcription::{AwsTranscribeJobs, DEFAULT_FETCH_TIMEOUT, TranscriptionPoller};
use crate::core::tts::AwsPollySynthesizer;

/// Application state shared by all handlers.
///
/// Immutable after construction; every request gets its own correlation key
/// and cancellation token.
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: VoicePipeline,
}

impl AppState {
    /// Build the production clients from `config`.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let aws = config.aws_settings();
        let sdk_config = load_sdk_config(&aws).await;

        let store = AudioStore::s3(&config.storage_settings(), &aws)
            .context("Failed to create upload store")?;

        let transcription = config.transcription_config();
        let poller = TranscriptionPoller::new(
            Arc::new(AwsTranscribeJobs::new(&sdk_config)),
            TranscriptionPoller::http_client(DEFAULT_FETCH_TIMEOUT)
                .context("Failed to create transcript download client")?,
            transcription.poll,
        );

        let generator = PalmTextGenerator::new(config.generation_config())
            .context("Failed to create text generation client")?;
        let synthesizer = AwsPollySynthesizer::new(&sdk_config);

        info!(
            bucket = %store.bucket(),
            region = %aws.region,
            explicit_credentials = aws.has_explicit_credentials(),
            model = %config.model_name,
            poll_interval_secs = transcription.poll.interval.as_secs(),
            max_poll_attempts = transcription.poll.max_attempts,
            max_poll_wait_secs = transcription.poll.max_wait().as_secs(),
            "Relay clients initialized"
        );

        let pipeline = VoicePipeline::new(
            store,
            poller,
            Arc::new(generator),
            Arc::new(synthesizer),
            &transcription,
        );

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Assemble state around an already-built pipeline.
    pub fn with_pipeline(config: ServerConfig, pipeline: VoicePipeline) -> Arc<Self> {
        Arc::new(Self { config, pipeline })
    }
}
