//! Object storage for uploaded audio clips.
//!
//! Uploads go to an S3-compatible bucket through the `object_store` crate.
//! The store is held as `Arc<dyn ObjectStore>` so tests can swap in
//! `object_store::memory::InMemory`.

use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::{ObjectStore, PutPayload, path::Path as ObjectPath};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::providers::AwsSettings;

/// Errors raised while storing uploaded audio.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid object key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: object_store::path::Error,
    },

    #[error("Failed to store object '{key}': {source}")]
    Put {
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to configure object store: {0}")]
    Configuration(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Bucket location and addressing for uploaded audio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Bucket the uploads are written to
    pub bucket: String,
    /// Prefix the transcription service uses to address stored objects.
    /// Defaults to `s3://{bucket}/`.
    pub media_uri_prefix: Option<String>,
    /// Custom S3-compatible endpoint (e.g., MinIO, LocalStack)
    pub endpoint: Option<String>,
}

impl StorageSettings {
    /// Resolved media URI prefix, always ending with `/`.
    pub fn media_uri_prefix(&self) -> String {
        let prefix = self
            .media_uri_prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("s3://{}/", self.bucket));

        if prefix.ends_with('/') {
            prefix
        } else {
            format!("{prefix}/")
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size: usize,
    /// URI the transcription service reads the object from
    pub media_uri: String,
}

/// Client for the audio upload bucket.
#[derive(Clone)]
pub struct AudioStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    media_uri_prefix: String,
}

impl std::fmt::Debug for AudioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStore")
            .field("bucket", &self.bucket)
            .field("media_uri_prefix", &self.media_uri_prefix)
            .finish()
    }
}

impl AudioStore {
    /// Wrap an existing object store.
    pub fn new(store: Arc<dyn ObjectStore>, settings: &StorageSettings) -> Self {
        Self {
            store,
            bucket: settings.bucket.clone(),
            media_uri_prefix: settings.media_uri_prefix(),
        }
    }

    /// Build an S3-backed store from configuration.
    ///
    /// Explicit credentials in `aws` take precedence over `AWS_*` environment
    /// variables picked up by the builder.
    pub fn s3(settings: &StorageSettings, aws: &AwsSettings) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&settings.bucket)
            .with_region(&aws.region);

        if aws.has_explicit_credentials() {
            if let (Some(key), Some(secret)) = (&aws.access_key_id, &aws.secret_access_key) {
                builder = builder
                    .with_access_key_id(key)
                    .with_secret_access_key(secret);
            }
        }

        if let Some(endpoint) = settings.endpoint.as_deref().filter(|e| !e.is_empty()) {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder.build().map_err(|e| {
            error!(bucket = %settings.bucket, error = %e, "Failed to build S3 client");
            StorageError::Configuration(e.to_string())
        })?;

        info!(bucket = %settings.bucket, region = %aws.region, "Audio storage configured");
        Ok(Self::new(Arc::new(store), settings))
    }

    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// URI the transcription service uses to read `key`.
    pub fn media_uri(&self, key: &str) -> String {
        format!("{}{key}", self.media_uri_prefix)
    }

    /// Upload `bytes` under `key`, overwriting any existing object.
    pub async fn store(&self, key: &str, bytes: Bytes) -> StorageResult<StoredObject> {
        let path = ObjectPath::parse(key).map_err(|source| StorageError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        let size = bytes.len();

        debug!(bucket = %self.bucket, key = %key, bytes = size, "Uploading audio object");

        self.store
            .put(&path, PutPayload::from(bytes))
            .await
            .map_err(|source| StorageError::Put {
                key: key.to_string(),
                source,
            })?;

        Ok(StoredObject {
            key: key.to_string(),
            size,
            media_uri: self.media_uri(key),
        })
    }
}
