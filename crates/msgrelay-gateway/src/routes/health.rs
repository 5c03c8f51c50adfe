//! Health check endpoint.

use axum::{routing::get, Json, Router};

use crate::json::HealthResponse;
use crate::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check handler. Confirms the process is reachable; touches nothing
/// else.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
