//! Identity endpoints. Tokens are issued elsewhere.

use axum::{extract::State, routing::get, Json, Router};

use roombook_core::models::User;

use super::{AppError, AppResult, AppState, AuthUser};

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Current user, resolved from the access token
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<User>> {
    state
        .users
        .get_by_id(auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User not found"))
}
