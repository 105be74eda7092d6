//! Request-level error type.
//!
//! Every failure a relay request can hit maps to one [`AppError`] with a
//! stable machine-readable code and HTTP status. The response body carries a
//! short client message; provider detail is only available through
//! `Display` for server-side logging.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::core::generation::GenerationError;
use crate::core::storage::StorageError;
use crate::core::transcription::TranscriptionError;
use crate::core::tts::SynthesisError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No audio file uploaded")]
    MissingAudio,

    #[error("Invalid multipart request: {0}")]
    InvalidMultipart(String),

    #[error("Upload exceeds the size limit: {0}")]
    UploadTooLarge(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Machine-readable error code returned in the `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAudio => "missing_audio",
            Self::InvalidMultipart(_) => "invalid_multipart",
            Self::UploadTooLarge(_) => "upload_too_large",
            Self::Storage(_) => "upload_failed",
            Self::Transcription(e) => match e {
                TranscriptionError::Start(_) => "transcription_start_failed",
                TranscriptionError::Status(_) => "transcription_status_failed",
                TranscriptionError::JobFailed { .. } => "transcription_failed",
                TranscriptionError::MissingTranscriptUri | TranscriptionError::Fetch(_) => {
                    "transcript_fetch_failed"
                }
                TranscriptionError::EmptyTranscript => "empty_transcript",
                TranscriptionError::TimedOut { .. } => "transcription_timeout",
                TranscriptionError::Cancelled => "request_cancelled",
            },
            Self::Generation(_) => "generation_failed",
            Self::Synthesis(_) => "synthesis_failed",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAudio | Self::InvalidMultipart(_) => StatusCode::BAD_REQUEST,
            Self::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Transcription(e) => match e {
                TranscriptionError::JobFailed { .. } | TranscriptionError::EmptyTranscript => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                TranscriptionError::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
                TranscriptionError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Storage(_) | Self::Generation(_) | Self::Synthesis(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::MissingAudio => "No audio file uploaded",
            Self::InvalidMultipart(_) => "Malformed multipart request",
            Self::UploadTooLarge(_) => "Audio upload is too large",
            Self::Storage(_) => "Failed to upload audio",
            Self::Transcription(e) => match e {
                TranscriptionError::Start(_) => "Failed to start transcription",
                TranscriptionError::Status(_) => "Failed to check transcription status",
                TranscriptionError::JobFailed { .. } => "Transcription failed",
                TranscriptionError::MissingTranscriptUri | TranscriptionError::Fetch(_) => {
                    "Failed to fetch transcription results"
                }
                TranscriptionError::EmptyTranscript => "No transcription found",
                TranscriptionError::TimedOut { .. } => "Transcription did not finish in time",
                TranscriptionError::Cancelled => "Request cancelled",
            },
            Self::Generation(_) => "Failed to generate a reply",
            Self::Synthesis(_) => "Failed to synthesize speech",
            Self::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({
                "error": self.client_message(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}
