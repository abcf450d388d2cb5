//! Health probes.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::services::catalog;
use crate::state::AppState;

/// Liveness: the process is serving requests.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness: Flowhub answers its health check.
#[instrument(skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match catalog::health(state.flowhub()).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "flowhub unavailable"),
    }
}
