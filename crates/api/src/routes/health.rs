use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::report::reports_enabled;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Records currently held in memory.
    pub potholes: usize,
    /// Whether `/generate_pdf` is compiled in.
    pub reports: bool,
}

/// GET /health -- returns service status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let potholes = state.collection.read().await.len();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        potholes,
        reports: reports_enabled(),
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
