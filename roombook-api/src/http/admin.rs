use axum::{extract::State, routing::get, Json, Router};

use roombook_core::models::AdminStats;

use super::{AdminUser, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

pub async fn stats(State(state): State<AppState>, AdminUser(admin): AdminUser) -> AppResult<Json<AdminStats>> {
    tracing::debug!(admin = admin.user_id, "Admin stats requested");
    Ok(Json(state.stats.admin_stats().await?))
}
