use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use roombook_core::models::{Room, RoomListQuery};

use super::{AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms))
        .route("/{id}", get(get_room))
}

/// List rooms, optionally filtered with `?type=`
pub async fn list_rooms(State(state): State<AppState>, Query(query): Query<RoomListQuery>) -> AppResult<Json<Vec<Room>>> {
    Ok(Json(state.rooms.list(&query).await?))
}

pub async fn get_room(State(state): State<AppState>, Path(room_id): Path<i64>) -> AppResult<Json<Room>> {
    state
        .rooms
        .get_by_id(room_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Room {room_id} not found")))
}
