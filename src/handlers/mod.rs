//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `relay` - Audio upload to spoken reply

pub mod api;
pub mod relay;

pub use relay::relay_audio;
