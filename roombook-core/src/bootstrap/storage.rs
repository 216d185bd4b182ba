//! Local store location resolution

use std::path::{Path, PathBuf};
use tracing::debug;

use super::fallback::redact_uri;
use super::BootstrapError;
use crate::config::LOCAL_URI_PREFIX;

/// Where a database URI points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// A SQLite file on disk, already resolved against the base directory
    LocalFile(PathBuf),
    /// `sqlite::memory:` or bare `sqlite://`
    InMemory,
    /// Any network scheme (postgres, mysql, ...)
    Network(String),
}

impl StorageLocation {
    /// Classify a database URI.
    ///
    /// `sqlite:///data/app.db` is relative to `base_dir`; a fourth slash
    /// (`sqlite:////var/lib/app.db`) makes the path absolute.
    pub fn parse(uri: &str, base_dir: &Path) -> Result<Self, BootstrapError> {
        if let Some(rest) = uri.strip_prefix(LOCAL_URI_PREFIX) {
            let file = rest.split('?').next().unwrap_or_default();
            if file.is_empty() {
                return Err(invalid(uri, "missing database file path"));
            }
            let path = Path::new(file);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            };
            return Ok(Self::LocalFile(path));
        }

        if uri == "sqlite://" || uri.starts_with("sqlite::memory:") {
            return Ok(Self::InMemory);
        }

        if uri.starts_with("sqlite") {
            return Err(invalid(uri, "local stores must use the sqlite:///<path> form"));
        }

        url::Url::parse(uri).map_err(|e| invalid(uri, &e.to_string()))?;
        Ok(Self::Network(uri.to_string()))
    }

    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::LocalFile(_) | Self::InMemory)
    }

    /// URL understood by the sqlx `Any` driver
    #[must_use]
    pub fn connect_url(&self) -> String {
        match self {
            Self::LocalFile(path) => format!("sqlite://{}?mode=rwc", path.display()),
            Self::InMemory => "sqlite::memory:".to_string(),
            Self::Network(uri) => uri.clone(),
        }
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalFile(path) => write!(f, "local file {}", path.display()),
            Self::InMemory => f.write_str("in-memory"),
            Self::Network(uri) => write!(f, "network {}", redact_uri(uri)),
        }
    }
}

fn invalid(uri: &str, reason: &str) -> BootstrapError {
    BootstrapError::InvalidDatabaseUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    }
}

/// Make sure the directory holding a local-file store exists.
///
/// Returns the parsed location. Network and in-memory URIs are returned
/// untouched. Safe to call repeatedly.
pub fn ensure_storage_location(uri: &str, base_dir: &Path) -> Result<StorageLocation, BootstrapError> {
    let location = StorageLocation::parse(uri, base_dir)?;

    if let StorageLocation::LocalFile(path) = &location {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| BootstrapError::StorageDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
            debug!(directory = %parent.display(), "Local store directory ready");
        }
    }

    Ok(location)
}
