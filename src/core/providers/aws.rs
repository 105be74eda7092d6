//! Shared AWS settings and SDK configuration loading.
//!
//! Amazon Transcribe and Amazon Polly clients are built from the same
//! [`aws_config::SdkConfig`]. Credentials can be provided via:
//! 1. `access_key_id` and `secret_access_key` in [`AwsSettings`]
//! 2. Environment variables: `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`
//! 3. AWS credentials file (`~/.aws/credentials`)
//! 4. IAM instance profile (for EC2/ECS/Lambda)

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use tracing::debug;

/// Default region when none is configured.
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Provider name attached to explicitly configured credentials.
const CREDENTIALS_PROVIDER_NAME: &str = "voice-relay";

/// AWS region and optional static credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    /// AWS region (e.g., "us-east-1", "eu-west-1")
    pub region: String,
    /// AWS access key ID (optional if using the default credential chain)
    pub access_key_id: Option<String>,
    /// AWS secret access key (optional if using the default credential chain)
    pub secret_access_key: Option<String>,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            region: DEFAULT_AWS_REGION.to_string(),
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

impl AwsSettings {
    /// Returns true if both the access key and the secret key are set.
    pub fn has_explicit_credentials(&self) -> bool {
        matches!(
            (&self.access_key_id, &self.secret_access_key),
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty()
        )
    }

    /// Static credentials, if configured.
    pub fn credentials(&self) -> Option<Credentials> {
        if !self.has_explicit_credentials() {
            return None;
        }
        let access_key = self.access_key_id.as_deref()?;
        let secret_key = self.secret_access_key.as_deref()?;
        Some(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        ))
    }
}

/// Load the SDK configuration shared by all AWS service clients.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()));

    match settings.credentials() {
        Some(credentials) => {
            debug!(region = %settings.region, "Using explicit AWS credentials");
            loader.credentials_provider(credentials).load().await
        }
        None => {
            debug!(region = %settings.region, "Using default AWS credential chain");
            loader.load().await
        }
    }
}
