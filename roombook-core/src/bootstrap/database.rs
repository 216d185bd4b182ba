//! Persistence layer and migration tool

use sqlx::{any::AnyPoolOptions, AnyPool};
use sqlx::migrate::Migrator;
use tracing::{error, info};

use super::{BootstrapError, StorageLocation};
use crate::config::DatabaseConfig;
use crate::{Error, Result};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Connection pool for whichever datastore the bootstrap settled on
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    location: StorageLocation,
}

impl Database {
    /// Create the pool without opening any connection.
    ///
    /// Only URL parsing can fail here; connections are established on first use.
    pub fn connect_lazy(location: &StorageLocation, config: &DatabaseConfig) -> std::result::Result<Self, BootstrapError> {
        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new().test_before_acquire(true);
        options = match location {
            // Every connection to :memory: is a separate database
            StorageLocation::InMemory => options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            _ => options.max_connections(config.max_connections),
        };

        let pool = options
            .connect_lazy(&location.connect_url())
            .map_err(|e| BootstrapError::Extension {
                extension: "persistence",
                reason: e.to_string(),
            })?;

        Ok(Self {
            pool,
            location: location.clone(),
        })
    }

    #[must_use]
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    #[must_use]
    pub const fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Round-trip used by the health endpoint
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Schema migration tool bound to a [`Database`]
#[derive(Debug, Clone)]
pub struct MigrationTool {
    migrator: &'static Migrator,
    database: Database,
}

impl MigrationTool {
    /// A migration tool only exists on top of an initialized persistence layer.
    #[must_use]
    pub fn bind(database: &Database) -> Self {
        Self {
            migrator: &MIGRATOR,
            database: database.clone(),
        }
    }

    /// Number of migrations shipped with this build
    #[must_use]
    pub fn known(&self) -> usize {
        self.migrator.iter().count()
    }

    /// Apply all pending migrations
    pub async fn run(&self) -> Result<()> {
        info!("Running database migrations...");
        self.migrator.run(self.database.pool()).await.map_err(|e| {
            error!("Failed to run migrations: {}", e);
            Error::Internal(format!("Migration failed: {e}"))
        })?;
        info!("Migrations completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_migrates() {
        let database = Database::connect_lazy(&StorageLocation::InMemory, &DatabaseConfig::default()).unwrap();
        let migrations = MigrationTool::bind(&database);

        assert!(migrations.known() > 0);
        migrations.run().await.unwrap();
        // Running again is a no-op
        migrations.run().await.unwrap();
        database.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_local_file_is_created_on_first_use() {
        let tmp = tempfile::tempdir().unwrap();
        let location = StorageLocation::LocalFile(tmp.path().join("app.db"));
        let database = Database::connect_lazy(&location, &DatabaseConfig::default()).unwrap();

        assert!(!tmp.path().join("app.db").exists());
        database.ping().await.unwrap();
        assert!(tmp.path().join("app.db").exists());
        database.close().await;
    }
}
