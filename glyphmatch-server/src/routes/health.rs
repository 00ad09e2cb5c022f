use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint (liveness)
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let set = state.recognizer.templates();
    Json(json!({
        "status": "healthy",
        "service": "glyphmatch-server",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started.elapsed().as_secs(),
        "templates": set.num_templates(),
        "labels": set.num_labels(),
    }))
}
