//! `generateText` client.
//!
//! # API Reference
//!
//! - Endpoint: `POST {base_url}/v1beta2/{model}:generateText?key={api_key}`
//! - Body: `{"prompt": {"text": "..."}}`
//! - Reply: `candidates[0].output`

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use super::config::GenerationConfig;
use super::messages::{ApiErrorResponse, GenerateTextRequest, GenerateTextResponse};
use super::{GenerationError, GenerationResult, normalize_reply};

/// Language model that turns a transcript into a reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a normalized reply for `prompt`.
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;
}

/// HTTP client for the PaLM `generateText` API.
#[derive(Clone)]
pub struct PalmTextGenerator {
    http: Client,
    config: GenerationConfig,
    endpoint: String,
}

impl std::fmt::Debug for PalmTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PalmTextGenerator")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PalmTextGenerator {
    pub fn new(config: GenerationConfig) -> GenerationResult<Self> {
        config.validate().map_err(GenerationError::Configuration)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint(),
            http,
            config,
        })
    }

    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Turn a non-2xx response into a [`GenerationError::Api`].
    fn api_error(status: reqwest::StatusCode, body: &str) -> GenerationError {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.chars().take(200).collect());

        GenerationError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl TextGenerator for PalmTextGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        debug!(
            model = %self.config.model_resource(),
            prompt_len = prompt.len(),
            "Requesting text generation"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&GenerateTextRequest::new(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Request(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            let err = Self::api_error(status, &body);
            error!(status = status.as_u16(), error = %err, "Text generation API error");
            return Err(err);
        }

        let parsed: GenerateTextResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let output = parsed.first_output().ok_or(GenerationError::NoCandidates)?;
        let reply = normalize_reply(output);
        if reply.is_empty() {
            return Err(GenerationError::EmptyReply);
        }

        debug!(reply_len = reply.len(), "Text generation complete");
        Ok(reply)
    }
}
