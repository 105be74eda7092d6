//! In-process provider fakes and request builders for relay tests.
//!
//! - `ScriptedTranscription`: replays a fixed status sequence for every job
//! - `RecordingGenerator`: records prompts and answers with a fixed reply
//! - `RecordingSynthesizer`: records texts and answers with fake MP3 bytes
//!
//! Storage uses `object_store::memory::InMemory`; transcript documents,
//! generation and Polly calls are served by `wiremock` where a test needs
//! the real HTTP clients.

// Allow dead code in test infrastructure - not every test file uses every helper
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, header};
use object_store::memory::InMemory;

use voice_relay::ServerConfig;
use voice_relay::core::generation::{GenerationError, GenerationResult, TextGenerator};
use voice_relay::core::pipeline::VoicePipeline;
use voice_relay::core::storage::{AudioStore, StorageSettings};
use voice_relay::core::transcription::{
    JobRequest, JobSnapshot, JobStatus, PollPolicy, TranscriptionConfig, TranscriptionPoller,
    TranscriptionResult, TranscriptionService,
};
use voice_relay::core::tts::{SpeechSynthesizer, SynthesisResult, SynthesizedAudio};
use voice_relay::state::AppState;

pub const TEST_BUCKET: &str = "voice-uploads";
pub const BOUNDARY: &str = "relay-test-boundary";

/// Bytes with an MP3 frame sync header.
pub const FAKE_MP3: &[u8] = &[0xff, 0xfb, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00];

// =============================================================================
// Transcription
// =============================================================================

/// Replays `statuses` for every job; the last status repeats once the
/// sequence is exhausted.
pub struct ScriptedTranscription {
    statuses: Vec<JobStatus>,
    transcript_uri: String,
    progress: Mutex<std::collections::HashMap<String, usize>>,
    pub started: Mutex<Vec<JobRequest>>,
    pub status_calls: Mutex<u32>,
}

impl ScriptedTranscription {
    pub fn new(statuses: Vec<JobStatus>, transcript_uri: impl Into<String>) -> Self {
        Self {
            statuses,
            transcript_uri: transcript_uri.into(),
            progress: Mutex::new(Default::default()),
            started: Mutex::new(Vec::new()),
            status_calls: Mutex::new(0),
        }
    }

    pub fn started_jobs(&self) -> Vec<JobRequest> {
        self.started.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> u32 {
        *self.status_calls.lock().unwrap()
    }
}

#[async_trait]
impl TranscriptionService for ScriptedTranscription {
    async fn start_job(&self, request: &JobRequest) -> TranscriptionResult<()> {
        self.started.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> TranscriptionResult<JobSnapshot> {
        *self.status_calls.lock().unwrap() += 1;

        let index = {
            let mut progress = self.progress.lock().unwrap();
            let seen = progress.entry(job_name.to_string()).or_insert(0);
            let index = (*seen).min(self.statuses.len() - 1);
            *seen += 1;
            index
        };

        let status = self.statuses[index];
        let snapshot = JobSnapshot::new(job_name, status);
        Ok(match status {
            JobStatus::Completed => snapshot.with_transcript_uri(&self.transcript_uri),
            JobStatus::Failed => snapshot.with_failure_reason("The media format is not supported"),
            _ => snapshot,
        })
    }
}

// =============================================================================
// Generation and Synthesis
// =============================================================================

pub struct RecordingGenerator {
    reply: Result<String, GenerationError>,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

#[derive(Default)]
pub struct RecordingSynthesizer {
    pub texts: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    pub fn calls(&self) -> usize {
        self.texts.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn synthesize(&self, text: &str) -> SynthesisResult<SynthesizedAudio> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(SynthesizedAudio::new(FAKE_MP3.to_vec(), "audio/mpeg"))
    }
}

// =============================================================================
// State Builders
// =============================================================================

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 3001,
        tls: None,
        cors_allowed_origins: None,
        max_upload_bytes: 1024 * 1024,
        aws_region: "us-east-1".to_string(),
        aws_access_key_id: None,
        aws_secret_access_key: None,
        s3_bucket: TEST_BUCKET.to_string(),
        s3_url: None,
        s3_endpoint: None,
        transcribe_language_code: "en-US".to_string(),
        transcription_job_suffix: "relay-job".to_string(),
        transcription_poll_interval_seconds: 5,
        transcription_max_poll_attempts: 120,
        model_name: "models/text-bison-001".to_string(),
        palm_api_key: "test-key".to_string(),
        generation_base_url: "http://127.0.0.1:9".to_string(),
        generation_timeout_seconds: 5,
    }
}

pub fn fast_poll(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(5),
        max_attempts,
    }
}

/// Handles to everything a relay test may inspect after a request.
pub struct Harness {
    pub state: Arc<AppState>,
    pub memory: Arc<InMemory>,
    pub transcription: Arc<ScriptedTranscription>,
}

pub fn harness(
    config: ServerConfig,
    transcription: Arc<ScriptedTranscription>,
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    poll: PollPolicy,
) -> Harness {
    let memory = Arc::new(InMemory::new());
    let store = AudioStore::new(
        memory.clone(),
        &StorageSettings {
            bucket: config.s3_bucket.clone(),
            media_uri_prefix: config.s3_url.clone(),
            endpoint: None,
        },
    );
    let poller = TranscriptionPoller::new(transcription.clone(), reqwest::Client::new(), poll);
    let transcription_config = TranscriptionConfig {
        poll,
        ..config.transcription_config()
    };
    let pipeline = VoicePipeline::new(store, poller, generator, synthesizer, &transcription_config);

    Harness {
        state: AppState::with_pipeline(config, pipeline),
        memory,
        transcription,
    }
}

// =============================================================================
// Request Builders
// =============================================================================

/// Encode a single multipart field.
pub fn multipart_body(field: &str, file_name: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match file_name {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n\
                 Content-Type: audio/webm\r\n\r\n"
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
        ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Upload `data` as `audioData` with a `sample.webm` file name.
pub fn audio_upload(uri: &str, data: &[u8]) -> Request<Body> {
    upload_request(uri, multipart_body("audioData", Some("sample.webm"), data))
}
