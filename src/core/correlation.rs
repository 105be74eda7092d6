//! Request-scoped correlation keys.
//!
//! A [`CorrelationKey`] ties together the uploaded object, the transcription
//! job started for it, and the response returned to the client. One key is
//! generated at request entry and passed explicitly to every stage, so two
//! requests in flight at the same time can never share an object key or a
//! job name.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Suffix appended to the correlation key to form the stored object key.
pub const AUDIO_OBJECT_SUFFIX: &str = "-audio.webm";

/// Number of random hex characters appended after the timestamp.
const RANDOM_SUFFIX_LEN: usize = 8;

/// Identifier shared by every artifact produced for a single request.
///
/// Format: `{unix_millis}-{8 hex chars}`, e.g. `1700000000000-3f2a9c1b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Generate a fresh key for an incoming request.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let random = Uuid::new_v4().simple().to_string();

        Self(format!("{millis}-{}", &random[..RANDOM_SUFFIX_LEN]))
    }

    /// Build a key from an existing value.
    ///
    /// Returns `None` when the value contains characters that are not
    /// accepted in object keys or transcription job names.
    pub fn from_existing(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        valid.then(|| Self(value.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Object key the uploaded audio is stored under.
    pub fn object_key(&self) -> String {
        format!("{}{AUDIO_OBJECT_SUFFIX}", self.0)
    }

    /// Transcription job name for this request.
    ///
    /// Deterministic: the same key and suffix always yield the same name.
    pub fn job_name(&self, suffix: &str) -> String {
        let suffix = suffix.trim().trim_matches('-');
        if suffix.is_empty() {
            self.0.clone()
        } else {
            format!("{}-{suffix}", self.0)
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
