use sqlx::{any::AnyRow, AnyPool, Row};

use crate::{
    models::{Reservation, ReservationStatus},
    Result,
};

/// Reservation repository for database operations
#[derive(Clone)]
pub struct ReservationRepository {
    pool: AnyPool,
}

impl ReservationRepository {
    #[must_use]
    pub const fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Reservations made by one user, soonest first
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT id, room_id, user_id, start_time, end_time, purpose, status
             FROM reservations
             WHERE user_id = $1
             ORDER BY start_time, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_reservation).collect()
    }

    fn row_to_reservation(row: AnyRow) -> Result<Reservation> {
        let status: String = row.try_get("status")?;

        Ok(Reservation {
            id: row.try_get("id")?,
            room_id: row.try_get("room_id")?,
            user_id: row.try_get("user_id")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            purpose: row.try_get("purpose")?,
            status: status.parse::<ReservationStatus>()?,
        })
    }
}
