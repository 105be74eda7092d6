use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file take priority over environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   max_upload_bytes: 26214400
///   cors_allowed_origins: "https://app.example.com"
///   tls:
///     cert_path: "/etc/relay/cert.pem"
///     key_path: "/etc/relay/key.pem"
///
/// aws:
///   region: "us-east-1"
///   access_key_id: "AKIA..."
///   secret_access_key: "..."
///
/// storage:
///   bucket: "voice-uploads"
///   url: "s3://voice-uploads/"
///   endpoint: "http://localhost:9000"
///
/// transcription:
///   language_code: "en-US"
///   job_suffix: "relay-job"
///   poll_interval_seconds: 5
///   max_poll_attempts: 120
///
/// generation:
///   model: "models/text-bison-001"
///   api_key: "your-api-key"
///   base_url: "https://generativelanguage.googleapis.com"
///   timeout_seconds: 30
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub aws: Option<AwsYaml>,
    pub storage: Option<StorageYaml>,
    pub transcription: Option<TranscriptionYaml>,
    pub generation: Option<GenerationYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
    pub cors_allowed_origins: Option<String>,
    pub max_upload_bytes: Option<usize>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// AWS account settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AwsYaml {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Upload bucket settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageYaml {
    pub bucket: Option<String>,
    /// Prefix used to address uploaded objects (e.g. `s3://bucket/`)
    pub url: Option<String>,
    pub endpoint: Option<String>,
}

/// Transcription job settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TranscriptionYaml {
    pub language_code: Option<String>,
    pub job_suffix: Option<String>,
    pub poll_interval_seconds: Option<u64>,
    pub max_poll_attempts: Option<u32>,
}

/// Text generation settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GenerationYaml {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
