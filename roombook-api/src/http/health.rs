//! Health check endpoint for monitoring probes

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::http::AppState;

/// Health check router
pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Reports whether the selected datastore answers
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = if state.database.location().is_local() { "local" } else { "primary" };

    match state.database.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok", "database": "ok", "store": store }))),
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable", "store": store })),
            )
        }
    }
}
