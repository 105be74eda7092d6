//! Job submission, bounded status polling, and transcript retrieval.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::TranscriptionService;
use super::config::PollPolicy;
use super::messages::{JobRequest, JobSnapshot, JobStatus, TranscriptDocument};
use super::{TranscriptionError, TranscriptionResult};

/// Drives a transcription job from submission to transcript text.
///
/// The status is checked once right after submission and then every
/// `policy.interval`. Polling stops on a terminal status, after
/// `policy.max_attempts` checks, or when the request's cancellation token
/// fires. Sleeping between checks yields to the runtime, so other requests
/// are served while a job is pending.
#[derive(Clone)]
pub struct TranscriptionPoller {
    service: Arc<dyn TranscriptionService>,
    http: reqwest::Client,
    policy: PollPolicy,
}

impl TranscriptionPoller {
    pub fn new(
        service: Arc<dyn TranscriptionService>,
        http: reqwest::Client,
        policy: PollPolicy,
    ) -> Self {
        Self {
            service,
            http,
            policy,
        }
    }

    /// HTTP client for transcript downloads, bounded by `timeout`.
    pub fn http_client(timeout: Duration) -> TranscriptionResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranscriptionError::Fetch(format!("HTTP client: {e}")))
    }

    #[inline]
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submit the job.
    pub async fn start(&self, request: &JobRequest) -> TranscriptionResult<()> {
        self.service.start_job(request).await
    }

    /// Query the job's current status once.
    pub async fn status(&self, job_name: &str) -> TranscriptionResult<JobSnapshot> {
        self.service.job_status(job_name).await
    }

    /// Poll until the job reaches a terminal status.
    ///
    /// Returns the transcript document URI on `COMPLETED`.
    pub async fn wait_for_completion(
        &self,
        job_name: &str,
        cancel: &CancellationToken,
    ) -> TranscriptionResult<String> {
        for attempt in 1..=self.policy.max_attempts {
            let snapshot = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                result = self.status(job_name) => result?,
            };

            if snapshot.status.is_terminal() {
                return Self::finish(job_name, attempt, snapshot);
            }

            debug!(
                job_name = %job_name,
                status = %snapshot.status,
                attempt,
                max_attempts = self.policy.max_attempts,
                "Transcription job still running"
            );

            if attempt == self.policy.max_attempts {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                _ = tokio::time::sleep(self.policy.interval) => {}
            }
        }

        warn!(
            job_name = %job_name,
            attempts = self.policy.max_attempts,
            "Gave up waiting for transcription job"
        );
        Err(TranscriptionError::TimedOut {
            attempts: self.policy.max_attempts,
        })
    }

    /// Turn a terminal snapshot into the transcript URI or a job error.
    fn finish(job_name: &str, attempt: u32, snapshot: JobSnapshot) -> TranscriptionResult<String> {
        if snapshot.status == JobStatus::Completed {
            info!(job_name = %job_name, attempt, "Transcription job completed");
            return snapshot
                .transcript_uri
                .filter(|uri| !uri.is_empty())
                .ok_or(TranscriptionError::MissingTranscriptUri);
        }

        let reason = snapshot
            .failure_reason
            .unwrap_or_else(|| "no reason given".to_string());
        warn!(
            job_name = %job_name,
            status = %snapshot.status,
            reason = %reason,
            "Transcription job failed or stopped"
        );
        Err(TranscriptionError::JobFailed {
            status: snapshot.status,
            reason,
        })
    }

    /// Download the transcript document and return its text.
    ///
    /// An empty or missing transcript is reported as
    /// [`TranscriptionError::EmptyTranscript`].
    pub async fn fetch_transcript(&self, uri: &str) -> TranscriptionResult<String> {
        let response = self
            .http
            .get(uri)
            .send()
            .await
            .map_err(|e| TranscriptionError::Fetch(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptionError::Fetch(format!(
                "Transcript download returned {status}"
            )));
        }

        let document: TranscriptDocument = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Fetch(format!("Invalid transcript document: {e}")))?;

        let text = document.text();
        if text.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }

        Ok(text.to_string())
    }
}
