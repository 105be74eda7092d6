//! Amazon Polly speech synthesis.
//!
//! Replies are rendered with a single `SynthesizeSpeech` call and returned
//! whole. The voice is fixed: Ruth on the neural engine, MP3 at 16 kHz.
//!
//! # Authentication
//!
//! The client is built from the shared AWS `SdkConfig`, so credentials come
//! from explicit keys in the relay configuration when present and from the
//! default provider chain (environment, profile, instance role) otherwise.
//!
//! # Text Length
//!
//! Polly rejects plain-text input over [`MAX_TEXT_LENGTH`] characters. Longer
//! replies are cut at that limit on a character boundary and a warning is
//! logged.

mod config;
mod provider;


pub use config::{CONTENT_TYPE, MAX_TEXT_LENGTH, SAMPLE_RATE, VOICE_ID};
pub use provider::{AwsPollySynthesizer, truncate_for_synthesis};
