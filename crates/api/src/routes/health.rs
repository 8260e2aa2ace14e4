//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Clients currently holding a rate limit bucket.
    pub tracked_clients: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        tracked_clients: state.registry.limiter().tracked_clients(),
    })
}

/// Creates health check routes. Not rate limited.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
