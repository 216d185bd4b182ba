use sqlx::{AnyPool, Row};

use crate::{models::AdminStats, Result};

/// Read-only aggregates for the admin dashboard
#[derive(Clone)]
pub struct StatsRepository {
    pool: AnyPool,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let totals = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM rooms) AS rooms,
                (SELECT COUNT(*) FROM rooms WHERE is_blocked <> 0) AS blocked_rooms,
                (SELECT COUNT(*) FROM reservations) AS reservations",
        )
        .fetch_one(&self.pool)
        .await?;

        let by_status = sqlx::query(
            "SELECT status, COUNT(*) AS total FROM reservations GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = AdminStats {
            users: totals.try_get("users")?,
            rooms: totals.try_get("rooms")?,
            blocked_rooms: totals.try_get("blocked_rooms")?,
            reservations: totals.try_get("reservations")?,
            ..AdminStats::default()
        };
        for row in by_status {
            stats
                .reservations_by_status
                .insert(row.try_get("status")?, row.try_get("total")?);
        }

        Ok(stats)
    }
}
