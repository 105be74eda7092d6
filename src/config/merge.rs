//! Merging of YAML values over environment values and defaults.

use std::path::PathBuf;

use super::env::{first_var, parse_var, var};
use super::yaml::YamlConfig;
use super::{
    DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, ServerConfig, TlsConfig,
};
use crate::core::generation::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::core::providers::DEFAULT_AWS_REGION;
use crate::core::transcription::{
    DEFAULT_JOB_SUFFIX, DEFAULT_LANGUAGE_CODE, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};

/// Blank YAML strings count as absent, like blank environment values.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build a [`ServerConfig`] from the environment, overridden by `yaml`.
///
/// Validation is left to the caller.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml.unwrap_or_default();
    let server = yaml.server.unwrap_or_default();
    let aws = yaml.aws.unwrap_or_default();
    let storage = yaml.storage.unwrap_or_default();
    let transcription = yaml.transcription.unwrap_or_default();
    let generation = yaml.generation.unwrap_or_default();

    // Server
    let host = non_blank(server.host)
        .or_else(|| var("HOST"))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match server.port {
        Some(port) => port,
        None => parse_var::<u16>("PORT")?.unwrap_or(DEFAULT_PORT),
    };

    let tls_yaml = server.tls.unwrap_or_default();
    let cert_path = non_blank(tls_yaml.cert_path).or_else(|| var("TLS_CERT_PATH"));
    let key_path = non_blank(tls_yaml.key_path).or_else(|| var("TLS_KEY_PATH"));
    let tls = match (cert_path, key_path) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => {
            return Err(
                "TLS_CERT_PATH and TLS_KEY_PATH must be set together to enable TLS".into(),
            );
        }
    };

    let cors_allowed_origins = non_blank(server.cors_allowed_origins)
        .or_else(|| var("CORS_ALLOWED_ORIGINS"));
    let max_upload_bytes = match server.max_upload_bytes {
        Some(bytes) => bytes,
        None => parse_var::<usize>("MAX_UPLOAD_BYTES")?.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
    };

    // AWS
    let aws_region = non_blank(aws.region)
        .or_else(|| var("AWS_REGION"))
        .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());
    let aws_access_key_id = non_blank(aws.access_key_id)
        .or_else(|| first_var(&["AWS_ACCESS_KEY", "AWS_ACCESS_KEY_ID"]));
    let aws_secret_access_key = non_blank(aws.secret_access_key)
        .or_else(|| first_var(&["AWS_SECRET_KEY", "AWS_SECRET_ACCESS_KEY"]));

    // Storage
    let s3_bucket = non_blank(storage.bucket)
        .or_else(|| var("S3_BUCKET_NAME"))
        .unwrap_or_default();
    let s3_url = non_blank(storage.url).or_else(|| var("S3_URL"));
    let s3_endpoint = non_blank(storage.endpoint).or_else(|| var("S3_ENDPOINT"));

    // Transcription
    let transcribe_language_code = non_blank(transcription.language_code)
        .or_else(|| var("TRANSCRIBE_LANGUAGE_CODE"))
        .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string());
    let transcription_job_suffix = non_blank(transcription.job_suffix)
        .or_else(|| var("TRANSCRIPTION_JOB_SUFFIX"))
        .unwrap_or_else(|| DEFAULT_JOB_SUFFIX.to_string());
    let transcription_poll_interval_seconds = match transcription.poll_interval_seconds {
        Some(secs) => secs,
        None => parse_var::<u64>("TRANSCRIPTION_POLL_INTERVAL_SECONDS")?
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs()),
    };
    let transcription_max_poll_attempts = match transcription.max_poll_attempts {
        Some(attempts) => attempts,
        None => parse_var::<u32>("TRANSCRIPTION_MAX_POLL_ATTEMPTS")?
            .unwrap_or(DEFAULT_MAX_POLL_ATTEMPTS),
    };

    // Generation
    let model_name = non_blank(generation.model)
        .or_else(|| var("MODEL_NAME"))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let palm_api_key = non_blank(generation.api_key)
        .or_else(|| var("PALM_API_KEY"))
        .unwrap_or_default();
    let generation_base_url = non_blank(generation.base_url)
        .or_else(|| var("GENERATION_BASE_URL"))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let generation_timeout_seconds = match generation.timeout_seconds {
        Some(secs) => secs,
        None => parse_var::<u64>("GENERATION_TIMEOUT_SECONDS")?
            .unwrap_or(DEFAULT_TIMEOUT.as_secs()),
    };

    Ok(ServerConfig {
        host,
        port,
        tls,
        cors_allowed_origins,
        max_upload_bytes,
        aws_region,
        aws_access_key_id,
        aws_secret_access_key,
        s3_bucket,
        s3_url,
        s3_endpoint,
        transcribe_language_code,
        transcription_job_suffix,
        transcription_poll_interval_seconds,
        transcription_max_poll_attempts,
        model_name,
        palm_api_key,
        generation_base_url,
        generation_timeout_seconds,
    })
}
