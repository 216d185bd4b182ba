use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup errors. Any of these stops the process before it serves.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Invalid database URI {uri:?}: {reason}")]
    InvalidDatabaseUri { uri: String, reason: String },

    #[error("Cannot create storage directory {}: {source}", path.display())]
    StorageDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database probe failed: {0}")]
    Probe(#[source] sqlx::Error),

    #[error("Failed to initialize {extension}: {reason}")]
    Extension {
        extension: &'static str,
        reason: String,
    },

    #[error("Invalid CORS configuration: {0}")]
    Cors(String),

    #[error("Route group {0} was not registered")]
    MissingRouteGroup(&'static str),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
