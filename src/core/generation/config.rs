//! Configuration for the text generation client.

use std::time::Duration;

/// Default model used for replies.
pub const DEFAULT_MODEL: &str = "models/text-bison-001";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// API version segment of the `generateText` endpoint.
pub const API_VERSION: &str = "v1beta2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Text generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Model name, with or without the `models/` prefix
    pub model: String,
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// API base URL (overridable for tests and proxies)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GenerationConfig {
    /// Fully qualified model resource name (`models/{name}`).
    pub fn model_resource(&self) -> String {
        let model = self.model.trim().trim_start_matches('/');
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    /// URL of the `generateText` call for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{API_VERSION}/{}:generateText",
            self.base_url.trim_end_matches('/'),
            self.model_resource()
        )
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("Generation API key is required".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("Generation model name is required".to_string());
        }
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid generation base URL '{}': {e}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Generation base URL must use http or https, got: {}",
                url.scheme()
            ));
        }
        if self.timeout.is_zero() {
            return Err("Generation timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}
