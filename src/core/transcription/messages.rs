//! Job state and transcript document types.

use serde::Deserialize;

/// Status of a batch transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Stopped,
}

impl JobStatus {
    /// Parse a provider status string.
    ///
    /// Unknown values are treated as still running; the poll bound keeps an
    /// unrecognized status from being waited on forever.
    pub fn from_provider(status: &str) -> Self {
        match status.to_ascii_uppercase().as_str() {
            "QUEUED" => Self::Queued,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            "STOPPED" => Self::Stopped,
            _ => Self::InProgress,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Stopped => "STOPPED",
        }
    }

    /// No further transitions happen after a terminal status.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for starting a transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub job_name: String,
    pub media_uri: String,
    pub language_code: String,
    pub media_format: Option<String>,
}

/// Point-in-time view of a transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub job_name: String,
    pub status: JobStatus,
    /// Location of the transcript document, set once the job completes
    pub transcript_uri: Option<String>,
    /// Provider-supplied reason, set when the job fails
    pub failure_reason: Option<String>,
}

impl JobSnapshot {
    pub fn new(job_name: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_name: job_name.into(),
            status,
            transcript_uri: None,
            failure_reason: None,
        }
    }

    pub fn with_transcript_uri(mut self, uri: impl Into<String>) -> Self {
        self.transcript_uri = Some(uri.into());
        self
    }

    pub fn with_failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }
}

/// Transcript document written by the transcription service.
///
/// Only the fields the relay reads are modelled:
///
/// ```json
/// {"jobName": "...", "results": {"transcripts": [{"transcript": "hello"}]}}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptDocument {
    #[serde(default)]
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptResults {
    #[serde(default)]
    pub transcripts: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub transcript: String,
}

impl TranscriptDocument {
    /// Text of the first transcript, trimmed. Empty when none was produced.
    pub fn text(&self) -> &str {
        self.results
            .transcripts
            .first()
            .map(|t| t.transcript.trim())
            .unwrap_or_default()
    }
}
