//! Bootstrap module for assembling the Roombook server
//!
//! This module handles:
//! - Configuration loading
//! - Local store directory preparation
//! - Primary datastore probing with fallback to the local store
//! - Extension initialization (persistence, migrations, hashing, tokens, rate limiting)

pub mod config;
pub mod database;
pub mod error;
pub mod extensions;
pub mod fallback;
pub mod probe;
pub mod storage;

pub use config::load_config;
pub use database::{Database, MigrationTool};
pub use error::BootstrapError;
pub use extensions::{register_extensions, ExtensionKind, Extensions};
pub use fallback::ensure_database_connection;
pub use probe::{ConnectivityProbe, ConnectivityProber, ProbeOutcome, SqlxConnector};
pub use storage::{ensure_storage_location, StorageLocation};
