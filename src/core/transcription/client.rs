//! Amazon Transcribe batch job client.
//!
//! Jobs read their media straight from the upload bucket, so the only inputs
//! are the job name, the media URI and the language code. Results are written
//! by the service to a transcript document whose URI is reported once the job
//! completes.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_transcribe::Client as TranscribeClient;
use aws_sdk_transcribe::error::DisplayErrorContext;
use aws_sdk_transcribe::types::{LanguageCode, Media, MediaFormat};
use tracing::{debug, error, info};

use super::messages::{JobRequest, JobSnapshot, JobStatus};
use super::{TranscriptionError, TranscriptionResult};

/// Batch transcription service.
///
/// Implemented by [`AwsTranscribeJobs`] in production and by scripted fakes
/// in tests.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Submit a new job.
    async fn start_job(&self, request: &JobRequest) -> TranscriptionResult<()>;

    /// Fetch the current state of a job.
    async fn job_status(&self, job_name: &str) -> TranscriptionResult<JobSnapshot>;
}

/// Amazon Transcribe implementation of [`TranscriptionService`].
#[derive(Clone, Debug)]
pub struct AwsTranscribeJobs {
    client: TranscribeClient,
}

impl AwsTranscribeJobs {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: TranscribeClient::new(sdk_config),
        }
    }

    pub fn from_client(client: TranscribeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranscriptionService for AwsTranscribeJobs {
    async fn start_job(&self, request: &JobRequest) -> TranscriptionResult<()> {
        debug!(
            job_name = %request.job_name,
            media_uri = %request.media_uri,
            language = %request.language_code,
            "Starting transcription job"
        );

        let media = Media::builder().media_file_uri(&request.media_uri).build();

        let output = self
            .client
            .start_transcription_job()
            .transcription_job_name(&request.job_name)
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .media(media)
            .set_media_format(request.media_format.as_deref().map(MediaFormat::from))
            .send()
            .await
            .map_err(|e| {
                error!(job_name = %request.job_name, error = %DisplayErrorContext(&e), "StartTranscriptionJob failed");
                TranscriptionError::Start(DisplayErrorContext(&e).to_string())
            })?;

        let started_name = output
            .transcription_job()
            .and_then(|job| job.transcription_job_name())
            .unwrap_or(request.job_name.as_str());
        info!(job_name = %started_name, "Transcription job started");

        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> TranscriptionResult<JobSnapshot> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| TranscriptionError::Status(DisplayErrorContext(&e).to_string()))?;

        let job = output.transcription_job().ok_or_else(|| {
            TranscriptionError::Status(format!("No job details returned for {job_name}"))
        })?;

        let status = job
            .transcription_job_status()
            .map(|s| JobStatus::from_provider(s.as_str()))
            .unwrap_or(JobStatus::InProgress);

        let mut snapshot = JobSnapshot::new(job_name, status);
        if let Some(uri) = job.transcript().and_then(|t| t.transcript_file_uri()) {
            snapshot = snapshot.with_transcript_uri(uri);
        }
        if let Some(reason) = job.failure_reason() {
            snapshot = snapshot.with_failure_reason(reason);
        }

        Ok(snapshot)
    }
}
