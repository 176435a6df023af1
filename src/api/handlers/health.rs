//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::dto::HealthResponse;
use crate::state::AppState;

/// `GET /health`
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness probe; also reports which configuration snapshot is active
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        version: crate::pkg_version().to_string(),
        config_version: state.config.current().version,
    })
}
