//! HTTP layer
//!
//! Route groups, extractors and middleware shared by the application.

pub mod admin;
pub mod auth;
pub mod cors;
pub mod error;
pub mod health;
pub mod middleware;
pub mod reservations;
pub mod rooms;
pub mod routes;
pub mod security;

use std::sync::Arc;

use roombook_core::{
    bootstrap::{Database, Extensions},
    repository::{ReservationRepository, RoomRepository, StatsRepository, UserRepository},
    service::{RateLimiter, TokenValidator},
    Config,
};

pub use error::{AppError, AppResult};
pub use middleware::{AdminUser, AuthUser};
pub use routes::RouteGroup;
pub use security::SecurityPolicy;

/// Application state shared across all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub database: Database,
    pub token_validator: Arc<TokenValidator>,
    pub rate_limiter: RateLimiter,
    pub rooms: RoomRepository,
    pub reservations: ReservationRepository,
    pub users: UserRepository,
    pub stats: StatsRepository,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<Config>, extensions: &Extensions) -> Self {
        let pool = extensions.database.pool().clone();
        Self {
            config,
            database: extensions.database.clone(),
            token_validator: extensions.token_validator.clone(),
            rate_limiter: extensions.rate_limiter.clone(),
            rooms: RoomRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            stats: StatsRepository::new(pool),
        }
    }
}
