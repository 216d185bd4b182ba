use sqlx::{any::AnyRow, AnyPool, Row};

use crate::{models::{Role, User}, Result};

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: AnyPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, name, role, created_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }

    fn row_to_user(row: AnyRow) -> Result<User> {
        let role: String = row.try_get("role")?;

        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: role.parse::<Role>()?,
            created_at: row.try_get("created_at")?,
        })
    }
}
