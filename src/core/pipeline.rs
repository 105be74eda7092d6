//! Per-request relay pipeline.
//!
//! One uploaded clip goes through a fixed sequence of stages:
//!
//! ```text
//! upload -> start transcription -> poll -> fetch transcript
//!        -> generate reply -> synthesize speech
//! ```
//!
//! The first failing stage ends the request. Nothing is rolled back: an
//! uploaded object stays in the bucket even if a later stage fails.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::correlation::CorrelationKey;
use crate::core::generation::TextGenerator;
use crate::core::storage::AudioStore;
use crate::core::transcription::{
    JobRequest, TranscriptionConfig, TranscriptionError, TranscriptionPoller, media_format_for_key,
};
use crate::core::tts::{SpeechSynthesizer, SynthesizedAudio};
use crate::errors::{AppError, AppResult};

/// Pipeline stage, used to label log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Upload,
    StartTranscription,
    PollTranscription,
    FetchTranscript,
    Generate,
    Synthesize,
}

impl PipelineStage {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::StartTranscription => "start_transcription",
            Self::PollTranscription => "poll_transcription",
            Self::FetchTranscript => "fetch_transcript",
            Self::Generate => "generate",
            Self::Synthesize => "synthesize",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upload, transcribe, answer and voice one clip.
#[derive(Clone)]
pub struct VoicePipeline {
    store: AudioStore,
    poller: TranscriptionPoller,
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    language_code: String,
    job_suffix: String,
}

impl VoicePipeline {
    pub fn new(
        store: AudioStore,
        poller: TranscriptionPoller,
        generator: Arc<dyn TextGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        transcription: &TranscriptionConfig,
    ) -> Self {
        Self {
            store,
            poller,
            generator,
            synthesizer,
            language_code: transcription.language_code.clone(),
            job_suffix: transcription.job_suffix.clone(),
        }
    }

    /// Run every stage for one request.
    ///
    /// `cancel` aborts the request at the next await point; it is checked
    /// between poll attempts and raced against every provider call.
    pub async fn run(
        &self,
        key: &CorrelationKey,
        audio: Bytes,
        cancel: &CancellationToken,
    ) -> AppResult<SynthesizedAudio> {
        let cid = key.as_str();

        let object_key = key.object_key();
        let stored = until_cancelled(cancel, async {
            self.store.store(&object_key, audio).await.map_err(AppError::from)
        })
        .await
        .inspect_err(|e| log_failure(cid, PipelineStage::Upload, e))?;
        info!(
            correlation_id = %cid,
            key = %stored.key,
            bytes = stored.size,
            "Audio uploaded"
        );

        let job_name = key.job_name(&self.job_suffix);
        let request = JobRequest {
            job_name: job_name.clone(),
            media_uri: stored.media_uri.clone(),
            language_code: self.language_code.clone(),
            media_format: media_format_for_key(&stored.key).map(str::to_string),
        };
        until_cancelled(cancel, async {
            self.poller.start(&request).await.map_err(AppError::from)
        })
        .await
        .inspect_err(|e| log_failure(cid, PipelineStage::StartTranscription, e))?;
        info!(correlation_id = %cid, job_name = %job_name, "Transcription started");

        let transcript_uri = self
            .poller
            .wait_for_completion(&job_name, cancel)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure(cid, PipelineStage::PollTranscription, e))?;
        info!(correlation_id = %cid, job_name = %job_name, "Transcription completed");

        let transcript = until_cancelled(cancel, async {
            self.poller
                .fetch_transcript(&transcript_uri)
                .await
                .map_err(AppError::from)
        })
        .await
        .inspect_err(|e| log_failure(cid, PipelineStage::FetchTranscript, e))?;
        info!(
            correlation_id = %cid,
            transcript_len = transcript.len(),
            "Transcript received"
        );

        let reply = until_cancelled(cancel, async {
            self.generator
                .generate(&transcript)
                .await
                .map_err(AppError::from)
        })
        .await
        .inspect_err(|e| log_failure(cid, PipelineStage::Generate, e))?;
        info!(correlation_id = %cid, reply_len = reply.len(), "Reply generated");

        let speech = until_cancelled(cancel, async {
            self.synthesizer
                .synthesize(&reply)
                .await
                .map_err(AppError::from)
        })
        .await
        .inspect_err(|e| log_failure(cid, PipelineStage::Synthesize, e))?;
        info!(
            correlation_id = %cid,
            bytes = speech.len(),
            content_type = speech.content_type,
            "Speech synthesized"
        );

        Ok(speech)
    }
}

async fn until_cancelled<T>(
    cancel: &CancellationToken,
    stage: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Transcription(TranscriptionError::Cancelled)),
        result = stage => result,
    }
}

fn log_failure(correlation_id: &str, stage: PipelineStage, err: &AppError) {
    error!(
        correlation_id = %correlation_id,
        stage = %stage,
        code = err.code(),
        error = %err,
        "Relay stage failed"
    );
}
