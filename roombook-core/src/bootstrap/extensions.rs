//! Extension initialization
//!
//! Extensions are created once, in a fixed order, and shared by every request
//! handler afterwards.

use std::sync::Arc;
use tracing::info;

use super::{BootstrapError, Database, MigrationTool, StorageLocation};
use crate::service::{PasswordHasher, RateLimiter, TokenValidator};
use crate::Config;

/// Process-wide capabilities, in initialization order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Persistence,
    Migrations,
    PasswordHashing,
    AuthTokens,
    RateLimiter,
}

impl ExtensionKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Persistence => "persistence",
            Self::Migrations => "migrations",
            Self::PasswordHashing => "password hashing",
            Self::AuthTokens => "auth tokens",
            Self::RateLimiter => "rate limiter",
        }
    }
}

/// Initialized extension handles
#[derive(Debug, Clone)]
pub struct Extensions {
    pub database: Database,
    pub migrations: MigrationTool,
    pub password_hasher: PasswordHasher,
    pub token_validator: Arc<TokenValidator>,
    pub rate_limiter: RateLimiter,
    order: Vec<ExtensionKind>,
}

impl Extensions {
    /// The order the extensions were brought up in
    #[must_use]
    pub fn initialization_order(&self) -> &[ExtensionKind] {
        &self.order
    }
}

/// Bring up every extension against the finalized configuration.
///
/// Must run after the datastore has been settled; the first failure aborts.
pub fn register_extensions(config: &Config, location: &StorageLocation) -> Result<Extensions, BootstrapError> {
    let mut order = Vec::with_capacity(5);

    let database = Database::connect_lazy(location, &config.database)?;
    order.push(ExtensionKind::Persistence);
    info!(location = %location, "Persistence layer initialized");

    let migrations = MigrationTool::bind(&database);
    order.push(ExtensionKind::Migrations);
    info!("Migration tool bound ({} known migrations)", migrations.known());

    let password_hasher = PasswordHasher::new().map_err(|e| failed(ExtensionKind::PasswordHashing, e))?;
    order.push(ExtensionKind::PasswordHashing);

    let token_validator = Arc::new(TokenValidator::new(&config.jwt));
    order.push(ExtensionKind::AuthTokens);
    info!(cookie = token_validator.cookie_name(), "Auth token validation initialized");

    let rate_limiter = RateLimiter::from_config(&config.rate_limit).map_err(|e| failed(ExtensionKind::RateLimiter, e))?;
    order.push(ExtensionKind::RateLimiter);
    info!(
        enabled = rate_limiter.is_enabled(),
        per_minute = rate_limiter.limit(),
        "Rate limiter initialized"
    );

    Ok(Extensions {
        database,
        migrations,
        password_hasher,
        token_validator,
        rate_limiter,
        order,
    })
}

fn failed(kind: ExtensionKind, err: crate::Error) -> BootstrapError {
    BootstrapError::Extension {
        extension: kind.name(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.jwt.secret = "test-secret".to_string();
        config
    }

    #[tokio::test]
    async fn test_initialization_order() {
        let extensions = register_extensions(&config(), &StorageLocation::InMemory).unwrap();

        assert_eq!(
            extensions.initialization_order(),
            &[
                ExtensionKind::Persistence,
                ExtensionKind::Migrations,
                ExtensionKind::PasswordHashing,
                ExtensionKind::AuthTokens,
                ExtensionKind::RateLimiter,
            ]
        );
    }

    #[tokio::test]
    async fn test_rate_limiter_failure_aborts() {
        let mut config = config();
        config.rate_limit.per_minute = 0;

        let err = register_extensions(&config, &StorageLocation::InMemory).unwrap_err();
        assert!(matches!(err, BootstrapError::Extension { extension: "rate limiter", .. }));
    }
}
