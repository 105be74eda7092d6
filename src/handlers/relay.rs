//! Audio relay endpoint.
//!
//! Accepts a `multipart/form-data` upload, runs it through the
//! [`VoicePipeline`](crate::core::pipeline::VoicePipeline) and answers with
//! the synthesized reply as `audio/mpeg`.
//!
//! The pipeline runs on its own task. If the client goes away, the handler
//! future is dropped, which cancels the request's token and stops the task at
//! its next await point.

use std::sync::Arc;

use axum::{
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::correlation::CorrelationKey;
use crate::core::tts::SynthesizedAudio;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Form field carrying the recorded clip.
pub const AUDIO_FIELD: &str = "audioData";

/// Response header echoing the request's correlation key.
pub const CORRELATION_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Handle `POST /getresponse` and `POST /transcribe`.
pub async fn relay_audio(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let key = CorrelationKey::generate();
    info!(correlation_id = %key, "Relay request received");

    let result = async {
        let multipart = multipart.map_err(|e| AppError::InvalidMultipart(e.body_text()))?;
        let audio = read_audio(multipart).await?;
        debug!(correlation_id = %key, bytes = audio.len(), "Audio received");
        run_pipeline(&state, &key, audio).await
    }
    .await;

    match result {
        Ok(speech) => {
            info!(
                correlation_id = %key,
                bytes = speech.len(),
                "Relay request completed"
            );
            audio_response(&key, speech)
        }
        Err(err) => {
            if err.status_code().is_client_error() {
                warn!(correlation_id = %key, code = err.code(), error = %err, "Relay request rejected");
            } else {
                error!(correlation_id = %key, code = err.code(), error = %err, "Relay request failed");
            }
            let mut response = err.into_response();
            insert_correlation_header(response.headers_mut(), &key);
            response
        }
    }
}

/// Pull the clip out of the form.
///
/// Prefers the `audioData` field; otherwise takes the first field that
/// carries a file name. Empty fields count as missing.
async fn read_audio(mut multipart: Multipart) -> AppResult<Bytes> {
    let mut fallback: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let is_audio_field = field.name() == Some(AUDIO_FIELD);
        let has_file_name = field.file_name().is_some();
        if !is_audio_field && (!has_file_name || fallback.is_some()) {
            continue;
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            continue;
        }

        if is_audio_field {
            return Ok(bytes);
        }
        fallback = Some(bytes);
    }

    fallback.ok_or(AppError::MissingAudio)
}

/// Body-limit overruns get their own error; everything else is a malformed form.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge(err.body_text())
    } else {
        AppError::InvalidMultipart(err.body_text())
    }
}

/// Run the pipeline on its own task, cancelling it if this future is dropped.
async fn run_pipeline(
    state: &Arc<AppState>,
    key: &CorrelationKey,
    audio: Bytes,
) -> AppResult<SynthesizedAudio> {
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let pipeline = state.pipeline.clone();
    let task_key = key.clone();
    let handle = tokio::spawn(async move { pipeline.run(&task_key, audio, &cancel).await });

    handle.await.map_err(|e| {
        AppError::Internal(if e.is_panic() {
            "relay task panicked".to_string()
        } else {
            "relay task aborted".to_string()
        })
    })?
}

fn audio_response(key: &CorrelationKey, speech: SynthesizedAudio) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(speech.content_type),
    );
    if let Ok(len) = HeaderValue::from_str(&speech.len().to_string()) {
        headers.insert(header::CONTENT_LENGTH, len);
    }
    insert_correlation_header(&mut headers, key);

    (StatusCode::OK, headers, speech.data).into_response()
}

fn insert_correlation_header(headers: &mut HeaderMap, key: &CorrelationKey) {
    if let Ok(value) = HeaderValue::from_str(key.as_str()) {
        headers.insert(CORRELATION_HEADER, value);
    }
}
