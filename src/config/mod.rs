//! Configuration module for the voice relay server
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use voice_relay::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod merge;
mod validation;
mod yaml;

use crate::core::generation::GenerationConfig;
use crate::core::providers::AwsSettings;
use crate::core::storage::StorageSettings;
use crate::core::transcription::{PollPolicy, TranscriptionConfig};

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_PORT: u16 = 3001;

/// Default request body limit for uploads (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// TLS configuration for HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Holds everything the relay needs at startup:
/// - Bind address, TLS, CORS and upload limit
/// - AWS account (credentials optional, default chain otherwise)
/// - Upload bucket addressing
/// - Transcription job settings and poll bounds
/// - Text generation model and key
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    /// Comma-separated list of allowed origins, or `*`
    pub cors_allowed_origins: Option<String>,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,

    // AWS settings
    pub aws_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,

    // Upload storage
    pub s3_bucket: String,
    /// Media URI prefix the transcription service reads uploads from.
    /// Defaults to `s3://{bucket}/`.
    pub s3_url: Option<String>,
    /// Custom S3-compatible endpoint
    pub s3_endpoint: Option<String>,

    // Transcription
    pub transcribe_language_code: String,
    pub transcription_job_suffix: String,
    pub transcription_poll_interval_seconds: u64,
    pub transcription_max_poll_attempts: u32,

    // Text generation
    pub model_name: String,
    pub palm_api_key: String,
    pub generation_base_url: String,
    pub generation_timeout_seconds: u64,
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.aws_access_key_id {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.aws_secret_access_key {
            secret.zeroize();
        }
        self.palm_api_key.zeroize();
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// The `.env` file is loaded into the environment by `main` before this
    /// is called, so actual environment variables win over `.env` values.
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            region: self.aws_region.clone(),
            access_key_id: self.aws_access_key_id.clone(),
            secret_access_key: self.aws_secret_access_key.clone(),
        }
    }

    pub fn storage_settings(&self) -> StorageSettings {
        StorageSettings {
            bucket: self.s3_bucket.clone(),
            media_uri_prefix: self.s3_url.clone(),
            endpoint: self.s3_endpoint.clone(),
        }
    }

    pub fn transcription_config(&self) -> TranscriptionConfig {
        TranscriptionConfig {
            language_code: self.transcribe_language_code.clone(),
            job_suffix: self.transcription_job_suffix.clone(),
            poll: PollPolicy {
                interval: Duration::from_secs(self.transcription_poll_interval_seconds),
                max_attempts: self.transcription_max_poll_attempts,
            },
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            model: self.model_name.clone(),
            api_key: self.palm_api_key.clone(),
            base_url: self.generation_base_url.clone(),
            timeout: Duration::from_secs(self.generation_timeout_seconds),
        }
    }
}
