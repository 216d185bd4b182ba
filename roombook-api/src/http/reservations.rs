use axum::{extract::State, routing::get, Json, Router};

use roombook_core::models::Reservation;

use super::{AppResult, AppState, AuthUser};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_my_reservations))
}

/// Reservations belonging to the caller
pub async fn list_my_reservations(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(state.reservations.list_for_user(auth.user_id).await?))
}
