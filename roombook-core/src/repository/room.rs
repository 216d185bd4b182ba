use sqlx::{any::AnyRow, AnyPool, Row};

use crate::{
    models::{Room, RoomListQuery},
    Result,
};

const ROOM_COLUMNS: &str = "id, name, location, room_type, capacity, description, is_blocked";

/// Room repository for database operations
#[derive(Clone)]
pub struct RoomRepository {
    pool: AnyPool,
}

impl RoomRepository {
    #[must_use]
    pub const fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Get room by ID
    pub async fn get_by_id(&self, room_id: i64) -> Result<Option<Room>> {
        let row = sqlx::query(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"))
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_room).transpose()
    }

    /// List rooms ordered by name, optionally restricted to one type
    pub async fn list(&self, query: &RoomListQuery) -> Result<Vec<Room>> {
        let rows = match query.type_filter() {
            Some(room_type) => {
                sqlx::query(&format!(
                    "SELECT {ROOM_COLUMNS} FROM rooms WHERE room_type = $1 ORDER BY name, id"
                ))
                .bind(room_type.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY name, id"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(Self::row_to_room).collect()
    }

    fn row_to_room(row: AnyRow) -> Result<Room> {
        let is_blocked: i64 = row.try_get("is_blocked")?;

        Ok(Room {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            location: row.try_get("location")?,
            room_type: row.try_get("room_type")?,
            capacity: row.try_get("capacity")?,
            description: row.try_get("description")?,
            is_blocked: is_blocked != 0,
        })
    }
}
