use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// Health check; reports whether the upstream settings are complete.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "upstream_configured": state.gateway.is_configured(),
        "configuration_errors": state.gateway.configuration_errors(),
    }))
}
