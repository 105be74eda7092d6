//! Validation of a merged configuration.

use super::ServerConfig;

/// Validate required values and ranges.
///
/// Returns the first problem found.
pub(super) fn validate_config(config: &ServerConfig) -> Result<(), String> {
    validate_required("S3_BUCKET_NAME", &config.s3_bucket)?;
    validate_required("PALM_API_KEY", &config.palm_api_key)?;
    validate_aws_credentials(
        config.aws_access_key_id.as_deref(),
        config.aws_secret_access_key.as_deref(),
    )?;
    validate_polling(
        config.transcription_poll_interval_seconds,
        config.transcription_max_poll_attempts,
    )?;
    config.generation_config().validate()?;

    if config.max_upload_bytes == 0 {
        return Err("MAX_UPLOAD_BYTES must be greater than zero".to_string());
    }

    Ok(())
}

fn validate_required(name: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{name} is required"));
    }
    Ok(())
}

/// Explicit AWS credentials must come as a pair.
fn validate_aws_credentials(
    access_key_id: Option<&str>,
    secret_access_key: Option<&str>,
) -> Result<(), String> {
    match (access_key_id, secret_access_key) {
        (Some(_), None) => Err(
            "AWS_ACCESS_KEY is set without AWS_SECRET_KEY; set both or neither".to_string(),
        ),
        (None, Some(_)) => Err(
            "AWS_SECRET_KEY is set without AWS_ACCESS_KEY; set both or neither".to_string(),
        ),
        _ => Ok(()),
    }
}

fn validate_polling(interval_seconds: u64, max_attempts: u32) -> Result<(), String> {
    if interval_seconds == 0 {
        return Err("TRANSCRIPTION_POLL_INTERVAL_SECONDS must be greater than zero".to_string());
    }
    if max_attempts == 0 {
        return Err("TRANSCRIPTION_MAX_POLL_ATTEMPTS must be greater than zero".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("S3_BUCKET_NAME", "bucket").is_ok());
        let err = validate_required("S3_BUCKET_NAME", "  ").unwrap_err();
        assert_eq!(err, "S3_BUCKET_NAME is required");
    }

    #[test]
    fn test_validate_aws_credentials() {
        assert!(validate_aws_credentials(None, None).is_ok());
        assert!(validate_aws_credentials(Some("AKID"), Some("secret")).is_ok());
        assert!(validate_aws_credentials(Some("AKID"), None).is_err());
        assert!(validate_aws_credentials(None, Some("secret")).is_err());
    }

    #[test]
    fn test_validate_polling() {
        assert!(validate_polling(5, 120).is_ok());
        assert!(validate_polling(0, 120).is_err());
        assert!(validate_polling(5, 0).is_err());
    }
}
