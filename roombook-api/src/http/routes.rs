//! Route groups mounted under `/api`

use axum::Router;

use super::{admin, auth, reservations, rooms, AppState};

/// The route groups the application must expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteGroup {
    Auth,
    Rooms,
    Reservations,
    Admin,
}

impl RouteGroup {
    pub const ALL: [Self; 4] = [Self::Auth, Self::Rooms, Self::Reservations, Self::Admin];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Rooms => "rooms",
            Self::Reservations => "reservations",
            Self::Admin => "admin",
        }
    }

    /// Mount point of the group
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Auth => "/api/auth",
            Self::Rooms => "/api/rooms",
            Self::Reservations => "/api/reservations",
            Self::Admin => "/api/admin",
        }
    }

    #[must_use]
    pub fn router(self) -> Router<AppState> {
        match self {
            Self::Auth => auth::router(),
            Self::Rooms => rooms::router(),
            Self::Reservations => reservations::router(),
            Self::Admin => admin::router(),
        }
    }
}
