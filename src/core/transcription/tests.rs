//! Tests for transcription polling and transcript retrieval.
//!
//! Job status is scripted through an in-process [`TranscriptionService`];
//! transcript documents are served by `wiremock`.

use super::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

/// Scripted transcription service: returns queued statuses in order and
/// repeats the last one once the script runs out.
struct ScriptedService {
    script: Mutex<VecDeque<TranscriptionResult<JobSnapshot>>>,
    started: Mutex<Vec<JobRequest>>,
    status_calls: Mutex<u32>,
    fail_start: bool,
}

impl ScriptedService {
    fn new(script: Vec<TranscriptionResult<JobSnapshot>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            started: Mutex::new(Vec::new()),
            status_calls: Mutex::new(0),
            fail_start: false,
        }
    }

    fn statuses(job: &str, statuses: &[JobStatus], uri: &str) -> Self {
        Self::new(
            statuses
                .iter()
                .map(|s| {
                    let snapshot = JobSnapshot::new(job, *s);
                    Ok(if *s == JobStatus::Completed {
                        snapshot.with_transcript_uri(uri)
                    } else {
                        snapshot
                    })
                })
                .collect(),
        )
    }

    fn status_calls(&self) -> u32 {
        *self.status_calls.lock().unwrap()
    }
}

#[async_trait]
impl TranscriptionService for ScriptedService {
    async fn start_job(&self, request: &JobRequest) -> TranscriptionResult<()> {
        if self.fail_start {
            return Err(TranscriptionError::Start("access denied".to_string()));
        }
        self.started.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> TranscriptionResult<JobSnapshot> {
        *self.status_calls.lock().unwrap() += 1;
        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        next.unwrap_or_else(|| Ok(JobSnapshot::new(job_name, JobStatus::InProgress)))
    }
}

fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(5),
        max_attempts,
    }
}

fn poller(service: Arc<ScriptedService>, max_attempts: u32) -> TranscriptionPoller {
    TranscriptionPoller::new(service, reqwest::Client::new(), fast_policy(max_attempts))
}

fn request(job_name: &str) -> JobRequest {
    JobRequest {
        job_name: job_name.to_string(),
        media_uri: "s3://voice-uploads/T1-audio.webm".to_string(),
        language_code: "en-US".to_string(),
        media_format: Some("webm".to_string()),
    }
}

// =============================================================================
// Polling Tests
// =============================================================================

#[tokio::test]
async fn test_completes_after_in_progress_sequence() {
    let service = Arc::new(ScriptedService::statuses(
        "T1",
        &[
            JobStatus::InProgress,
            JobStatus::InProgress,
            JobStatus::Completed,
        ],
        "https://transcripts.example.com/T1.json",
    ));
    let poller = poller(service.clone(), 10);

    let uri = poller
        .wait_for_completion("T1", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(uri, "https://transcripts.example.com/T1.json");
    assert_eq!(service.status_calls(), 3);
}

#[tokio::test]
async fn test_queued_is_not_terminal() {
    let service = Arc::new(ScriptedService::statuses(
        "T1",
        &[JobStatus::Queued, JobStatus::Completed],
        "https://transcripts.example.com/T1.json",
    ));
    let poller = poller(service.clone(), 10);

    assert!(
        poller
            .wait_for_completion("T1", &CancellationToken::new())
            .await
            .is_ok()
    );
    assert_eq!(service.status_calls(), 2);
}

#[tokio::test]
async fn test_failed_job_stops_polling() {
    let service = Arc::new(ScriptedService::new(vec![
        Ok(JobSnapshot::new("T1", JobStatus::InProgress)),
        Ok(JobSnapshot::new("T1", JobStatus::Failed).with_failure_reason("Unsupported media")),
    ]));
    let poller = poller(service.clone(), 10);

    let err = poller
        .wait_for_completion("T1", &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        TranscriptionError::JobFailed { status, reason } => {
            assert_eq!(status, JobStatus::Failed);
            assert_eq!(reason, "Unsupported media");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(service.status_calls(), 2);
}

#[tokio::test]
async fn test_stopped_job_is_terminal() {
    let service = Arc::new(ScriptedService::statuses(
        "T1",
        &[JobStatus::Stopped],
        "",
    ));
    let poller = poller(service.clone(), 10);

    let err = poller
        .wait_for_completion("T1", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TranscriptionError::JobFailed {
            status: JobStatus::Stopped,
            ..
        }
    ));
    assert_eq!(service.status_calls(), 1);
}

#[tokio::test]
async fn test_polling_is_bounded() {
    let service = Arc::new(ScriptedService::statuses(
        "T1",
        &[JobStatus::InProgress],
        "",
    ));
    let poller = poller(service.clone(), 4);

    let err = poller
        .wait_for_completion("T1", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::TimedOut { attempts: 4 }));
    assert_eq!(service.status_calls(), 4);
}

#[tokio::test]
async fn test_cancellation_stops_polling() {
    let service = Arc::new(ScriptedService::statuses(
        "T1",
        &[JobStatus::InProgress],
        "",
    ));
    let poller = TranscriptionPoller::new(
        service.clone(),
        reqwest::Client::new(),
        PollPolicy {
            interval: Duration::from_secs(60),
            max_attempts: 1000,
        },
    );

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        poller.wait_for_completion("T1", &cancel),
    )
    .await
    .expect("poll loop must stop when cancelled");

    assert!(matches!(result, Err(TranscriptionError::Cancelled)));
    assert_eq!(service.status_calls(), 1);
}

#[tokio::test]
async fn test_already_cancelled_token_skips_status_check() {
    let service = Arc::new(ScriptedService::statuses(
        "T1",
        &[JobStatus::Completed],
        "https://transcripts.example.com/T1.json",
    ));
    let poller = poller(service.clone(), 10);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = poller.wait_for_completion("T1", &cancel).await;
    assert!(matches!(result, Err(TranscriptionError::Cancelled)));
    assert_eq!(service.status_calls(), 0);
}

#[tokio::test]
async fn test_status_error_is_reported() {
    let service = Arc::new(ScriptedService::new(vec![Err(TranscriptionError::Status(
        "throttled".to_string(),
    ))]));
    let poller = poller(service, 10);

    let err = poller
        .wait_for_completion("T1", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::Status(msg) if msg == "throttled"));
}

#[tokio::test]
async fn test_single_status_query() {
    let service = Arc::new(ScriptedService::statuses(
        "T1",
        &[JobStatus::Queued, JobStatus::InProgress],
        "",
    ));
    let poller = poller(service.clone(), 10);

    let first = poller.status("T1").await.unwrap();
    let second = poller.status("T1").await.unwrap();

    assert_eq!(first.status, JobStatus::Queued);
    assert_eq!(second.status, JobStatus::InProgress);
    assert_eq!(service.status_calls(), 2);
}

#[tokio::test]
async fn test_completed_without_uri() {
    let service = Arc::new(ScriptedService::new(vec![Ok(JobSnapshot::new(
        "T1",
        JobStatus::Completed,
    ))]));
    let poller = poller(service, 10);

    let err = poller
        .wait_for_completion("T1", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::MissingTranscriptUri));
}

#[tokio::test]
async fn test_start_records_request() {
    let service = Arc::new(ScriptedService::new(Vec::new()));
    let poller = poller(service.clone(), 1);

    poller.start(&request("T1")).await.unwrap();

    let started = service.started.lock().unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].job_name, "T1");
    assert_eq!(started[0].media_format.as_deref(), Some("webm"));
}

#[tokio::test]
async fn test_start_error_is_reported() {
    let mut service = ScriptedService::new(Vec::new());
    service.fail_start = true;
    let poller = poller(Arc::new(service), 1);

    let err = poller.start(&request("T1")).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::Start(_)));
}

// =============================================================================
// Transcript Fetch Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transcripts/T1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jobName": "T1",
            "results": {"transcripts": [{"transcript": "hello"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let poller = poller(Arc::new(ScriptedService::new(Vec::new())), 1);
    let text = poller
        .fetch_transcript(&format!("{}/transcripts/T1.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(text, "hello");
}

#[tokio::test]
async fn test_fetch_empty_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transcripts/T1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": {"transcripts": [{"transcript": ""}]}
        })))
        .mount(&server)
        .await;

    let poller = poller(Arc::new(ScriptedService::new(Vec::new())), 1);
    let err = poller
        .fetch_transcript(&format!("{}/transcripts/T1.json", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::EmptyTranscript));
    assert_eq!(err.to_string(), "No transcription found");
}

#[tokio::test]
async fn test_fetch_transcript_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let poller = poller(Arc::new(ScriptedService::new(Vec::new())), 1);
    let err = poller
        .fetch_transcript(&format!("{}/transcripts/T1.json", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::Fetch(msg) if msg.contains("403")));
}

#[tokio::test]
async fn test_fetch_transcript_invalid_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let poller = poller(Arc::new(ScriptedService::new(Vec::new())), 1);
    let err = poller
        .fetch_transcript(&format!("{}/transcripts/T1.json", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::Fetch(_)));
}

#[tokio::test]
async fn test_fetch_transcript_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "results": {"transcripts": [{"transcript": "late"}]}
                }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let http = TranscriptionPoller::http_client(Duration::from_millis(100)).unwrap();
    let poller = TranscriptionPoller::new(
        Arc::new(ScriptedService::new(Vec::new())),
        http,
        fast_policy(1),
    );

    let started = std::time::Instant::now();
    let err = poller
        .fetch_transcript(&format!("{}/transcripts/T1.json", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::Fetch(_)));
    assert!(started.elapsed() < Duration::from_secs(2));
}
