//! Shared provider plumbing.

pub mod aws;

pub use aws::{AwsSettings, DEFAULT_AWS_REGION, load_sdk_config};
