//! Application assembly
//!
//! `create_app` runs the startup sequence once and returns an [`Application`]
//! holding everything a server needs. [`Application::finish`] turns it into the
//! router that serves requests.

use axum::{middleware::from_fn_with_state, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use roombook_core::{
    bootstrap::{ensure_database_connection, register_extensions, BootstrapError, ConnectivityProbe, Extensions},
    logging::{configure_logging, LogControl},
    Config,
};

use crate::http::{
    cors::cors_layer,
    health,
    middleware::{rate_limit_middleware, security_headers_middleware},
    AppState, RouteGroup, SecurityPolicy,
};

/// The assembled application, before it is turned into a router
pub struct Application {
    config: Arc<Config>,
    extensions: Extensions,
    security: Option<SecurityPolicy>,
    groups: Vec<RouteGroup>,
    cors: Option<CorsLayer>,
}

impl Application {
    /// Wrap a finalized configuration and its initialized extensions
    #[must_use]
    pub fn new(config: Config, extensions: Extensions) -> Self {
        Self {
            config: Arc::new(config),
            extensions,
            security: None,
            groups: Vec::with_capacity(RouteGroup::ALL.len()),
            cors: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Groups registered so far, in registration order
    #[must_use]
    pub fn route_groups(&self) -> &[RouteGroup] {
        &self.groups
    }

    pub fn install_security(&mut self, policy: SecurityPolicy) {
        self.security = Some(policy);
    }

    /// Register a route group. Registering the same group twice has no effect.
    pub fn register_group(&mut self, group: RouteGroup) {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
    }

    pub fn install_cors(&mut self, layer: CorsLayer) {
        self.cors = Some(layer);
    }

    /// Build the request router.
    ///
    /// Fails if any required route group was never registered. Layers, from
    /// the outside in: tracing, security headers, CORS, rate limiting.
    pub fn finish(self) -> Result<Router, BootstrapError> {
        if let Some(missing) = RouteGroup::ALL.into_iter().find(|g| !self.groups.contains(g)) {
            return Err(BootstrapError::MissingRouteGroup(missing.name()));
        }

        let state = AppState::new(self.config.clone(), &self.extensions);

        let api = self
            .groups
            .iter()
            .fold(Router::new(), |router, group| router.nest(group.prefix(), group.router()))
            .layer(from_fn_with_state(state.clone(), rate_limit_middleware));

        let mut router = api.merge(health::create_health_router()).with_state(state);

        if let Some(cors) = self.cors {
            router = router.layer(cors);
        }
        if let Some(policy) = self.security {
            router = router.layer(from_fn_with_state(policy, security_headers_middleware));
        }

        Ok(router.layer(TraceLayer::new_for_http()))
    }
}

/// Run the startup sequence.
///
/// Steps, in order: settle the datastore (probe and fall back), initialize
/// extensions, install the security policy, register route groups, adjust
/// the log level, install the CORS policy. The first failure aborts.
pub async fn create_app(
    config: Config,
    prober: &dyn ConnectivityProbe,
    log: &LogControl,
) -> Result<Application, BootstrapError> {
    let (config, location) = ensure_database_connection(config, prober).await?;
    info!(store = %location, "Datastore selected");

    let extensions = register_extensions(&config, &location)?;
    let mut app = Application::new(config, extensions);

    app.install_security(SecurityPolicy::from_config(&app.config().security));

    for group in RouteGroup::ALL {
        app.register_group(group);
    }

    configure_logging(log, app.config().server.debug).map_err(|e| BootstrapError::Logging(e.to_string()))?;

    let cors = cors_layer(&app.config().cors)?;
    app.install_cors(cors);

    info!("Application assembled");
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roombook_core::bootstrap::StorageLocation;

    fn extensions() -> Extensions {
        let mut config = Config::default();
        config.jwt.secret = "test-secret".to_string();
        register_extensions(&config, &StorageLocation::InMemory).unwrap()
    }

    #[tokio::test]
    async fn test_finish_requires_every_route_group() {
        let mut app = Application::new(Config::default(), extensions());
        app.register_group(RouteGroup::Auth);
        app.register_group(RouteGroup::Rooms);
        app.register_group(RouteGroup::Reservations);

        let err = app.finish().unwrap_err();
        assert!(matches!(err, BootstrapError::MissingRouteGroup("admin")));
    }

    #[tokio::test]
    async fn test_register_group_is_idempotent() {
        let mut app = Application::new(Config::default(), extensions());
        for group in RouteGroup::ALL {
            app.register_group(group);
            app.register_group(group);
        }

        assert_eq!(app.route_groups(), &RouteGroup::ALL);
        assert!(app.finish().is_ok());
    }
}
