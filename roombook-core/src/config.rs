use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the local fallback store, relative to the base directory
pub const DEFAULT_LOCAL_DB_FILE: &str = "app.db";

/// Scheme prefix of a local-file database URI
pub const LOCAL_URI_PREFIX: &str = "sqlite:///";

const MAX_PROBE_TIMEOUT_MS: u64 = 60_000;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Interactive/debug mode. Keeps verbose logging and relaxes secret checks.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Primary datastore URI, either `sqlite:///...` or a network scheme
    pub uri: String,
    /// Directory relative local-file URIs are resolved against
    pub base_dir: PathBuf,
    /// Upper bound for the startup connectivity probe
    pub probe_timeout_ms: u64,
    pub max_connections: u32,
    /// Apply pending migrations before serving
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: format!("{LOCAL_URI_PREFIX}{DEFAULT_LOCAL_DB_FILE}"),
            base_dir: PathBuf::from("."),
            probe_timeout_ms: 3000,
            max_connections: 10,
            auto_migrate: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub origins: Vec<String>,
    /// Comma separated allow-list of request headers
    pub headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: Vec::new(),
            headers: "Content-Type".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HS256 signing secret shared with the token issuer
    pub secret: String,
    /// Cookie consulted when no Authorization header is sent
    pub cookie_name: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cookie_name: "access_token_cookie".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests per minute per client
    pub per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_minute: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Emit Strict-Transport-Security with this max-age when set
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit level; when unset the level follows `server.debug`
    pub level: Option<String>,
    pub format: String, // "json" or "pretty"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. `DATABASE_URL` (database URI only)
    /// 2. Environment variables (`ROOMBOOK_SERVER__PORT`, ...)
    /// 3. Config file (if provided)
    /// 4. Defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }

        builder = builder
            .add_source(
                Environment::with_prefix("ROOMBOOK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            )
            .set_override_option("database.uri", std::env::var("DATABASE_URL").ok())?;

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.absolutize_base_dir()?;
        Ok(config)
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    fn absolutize_base_dir(&mut self) -> Result<(), ConfigError> {
        if self.database.base_dir.is_relative() {
            let cwd = std::env::current_dir()
                .map_err(|e| ConfigError::Message(format!("Cannot resolve base_dir: {e}")))?;
            self.database.base_dir = cwd.join(&self.database.base_dir);
        }
        Ok(())
    }

    /// The well-known local fallback store: `sqlite:///` followed by
    /// `<base_dir>/app.db`. An absolute base directory yields the four-slash
    /// absolute form.
    #[must_use]
    pub fn default_local_uri(&self) -> String {
        let path = self.database.base_dir.join(DEFAULT_LOCAL_DB_FILE);
        format!("{LOCAL_URI_PREFIX}{}", path.display())
    }

    #[must_use]
    pub fn database_uri(&self) -> &str {
        &self.database.uri
    }

    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.database.probe_timeout_ms)
    }

    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Check the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.database.uri.trim().is_empty() {
            errors.push("database.uri must not be empty".to_string());
        }
        if self.database.probe_timeout_ms == 0 || self.database.probe_timeout_ms > MAX_PROBE_TIMEOUT_MS {
            errors.push(format!(
                "database.probe_timeout_ms must be between 1 and {MAX_PROBE_TIMEOUT_MS}"
            ));
        }
        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be at least 1".to_string());
        }
        if self.cors.headers.split(',').all(|h| h.trim().is_empty()) {
            errors.push("cors.headers must name at least one header".to_string());
        }
        if self.jwt.secret.is_empty() && !self.server.debug {
            errors.push("jwt.secret must be set unless server.debug is enabled".to_string());
        }
        if self.rate_limit.enabled && self.rate_limit.per_minute == 0 {
            errors.push("rate_limit.per_minute must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base(base: &str) -> Config {
        let mut config = Config::default();
        config.database.base_dir = PathBuf::from(base);
        config.jwt.secret = "test-secret".to_string();
        config
    }

    #[test]
    fn test_default_local_uri_under_base_dir() {
        let config = config_with_base("/srv/app");
        assert_eq!(config.default_local_uri(), "sqlite:////srv/app/app.db");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_uri(), "sqlite:///app.db");
        assert_eq!(config.cors.headers, "Content-Type");
        assert!(config.cors.origins.is_empty());
        assert_eq!(config.probe_timeout(), Duration::from_secs(3));
        assert!(!config.server.debug);
    }

    #[test]
    fn test_http_address() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 8080;
        assert_eq!(config.http_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(config_with_base("/srv/app").validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = Config::default();
        config.database.probe_timeout_ms = 0;
        config.cors.headers = " , ".to_string();
        config.rate_limit.per_minute = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("jwt.secret")));
        assert!(errors.iter().any(|e| e.contains("probe_timeout_ms")));
    }

    #[test]
    fn test_debug_mode_allows_missing_secret() {
        let mut config = Config::default();
        config.server.debug = true;
        assert!(config.validate().is_ok());
    }
}
