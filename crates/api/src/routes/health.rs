//! Health check endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Connectivity probe used by the mobile apps.
#[derive(Serialize)]
pub struct ConnectionResponse {
    /// Always `true` when the server answers.
    pub connection: bool,
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn verify_connection() -> Json<ConnectionResponse> {
    Json(ConnectionResponse { connection: true })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/connection/verify", get(verify_connection))
}
