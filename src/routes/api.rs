use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, relay};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
///
/// `/getresponse` and `/transcribe` are aliases for the same relay handler.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/getresponse", post(relay::relay_audio))
        .route("/transcribe", post(relay::relay_audio))
        .layer(TraceLayer::new_for_http())
}
