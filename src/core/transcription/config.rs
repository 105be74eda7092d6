//! Configuration for batch transcription jobs and status polling.

use std::time::Duration;

/// Default language code for transcription jobs.
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// Default suffix appended to the correlation key to form the job name.
pub const DEFAULT_JOB_SUFFIX: &str = "relay-job";

/// Default delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default maximum number of status checks (10 minutes at the default interval).
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 120;

/// Default timeout for downloading a transcript document.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// How often and for how long a job is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status checks
    pub interval: Duration,
    /// Maximum number of status checks before giving up
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    /// Upper bound on the time spent sleeping between status checks.
    pub fn max_wait(&self) -> Duration {
        self.interval
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }

    /// Validate the policy.
    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("Transcription poll interval must be greater than zero".to_string());
        }
        if self.max_attempts == 0 {
            return Err("Transcription max poll attempts must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Transcription job settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionConfig {
    /// BCP-47 language code of the recorded speech
    pub language_code: String,
    /// Suffix appended to the correlation key to build the job name
    pub job_suffix: String,
    /// Status polling policy
    pub poll: PollPolicy,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            job_suffix: DEFAULT_JOB_SUFFIX.to_string(),
            poll: PollPolicy::default(),
        }
    }
}

/// Media format hint for a stored object, derived from its extension.
pub fn media_format_for_key(key: &str) -> Option<&'static str> {
    let extension = key.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "webm" => Some("webm"),
        "mp3" => Some("mp3"),
        "mp4" | "m4a" => Some("mp4"),
        "wav" => Some("wav"),
        "flac" => Some("flac"),
        "ogg" => Some("ogg"),
        "amr" => Some("amr"),
        _ => None,
    }
}
