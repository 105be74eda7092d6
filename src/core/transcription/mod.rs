//! Batch speech-to-text: job submission, status polling, transcript fetch.
//!
//! The flow for one request:
//!
//! 1. [`TranscriptionPoller::start`] submits a job named after the request's
//!    correlation key, pointing at the stored audio object.
//! 2. [`TranscriptionPoller::wait_for_completion`] checks the job status on a
//!    fixed interval until it is `COMPLETED`, `FAILED` or `STOPPED`, the poll
//!    bound is reached, or the request is cancelled.
//! 3. [`TranscriptionPoller::fetch_transcript`] downloads the transcript
//!    document and extracts its text.

mod client;
mod config;
mod messages;
mod poller;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use client::{AwsTranscribeJobs, TranscriptionService};
pub use config::{
    DEFAULT_FETCH_TIMEOUT, DEFAULT_JOB_SUFFIX, DEFAULT_LANGUAGE_CODE, DEFAULT_MAX_POLL_ATTEMPTS,
    DEFAULT_POLL_INTERVAL, PollPolicy, TranscriptionConfig, media_format_for_key,
};
pub use messages::{JobRequest, JobSnapshot, JobStatus, TranscriptDocument};
pub use poller::TranscriptionPoller;

/// Errors raised while transcribing an uploaded clip.
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Failed to start transcription job: {0}")]
    Start(String),

    #[error("Failed to fetch transcription job status: {0}")]
    Status(String),

    #[error("Transcription job {status}: {reason}")]
    JobFailed { status: JobStatus, reason: String },

    #[error("Transcription job completed without a transcript location")]
    MissingTranscriptUri,

    #[error("Failed to fetch transcription results: {0}")]
    Fetch(String),

    #[error("No transcription found")]
    EmptyTranscript,

    #[error("Transcription job did not finish after {attempts} status checks")]
    TimedOut { attempts: u32 },

    #[error("Transcription cancelled")]
    Cancelled,
}

pub type TranscriptionResult<T> = Result<T, TranscriptionError>;
