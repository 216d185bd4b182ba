//! Primary datastore selection with local fallback

use tracing::{info, warn};

use super::probe::{ConnectivityProbe, ProbeOutcome};
use super::storage::{ensure_storage_location, StorageLocation};
use super::BootstrapError;
use crate::Config;

/// Settle which datastore the application will use.
///
/// Local URIs only get their directory prepared. Network URIs are probed; an
/// unreachable primary is swapped for the local fallback store. The returned
/// config is final for the rest of the process.
pub async fn ensure_database_connection(
    config: Config,
    prober: &dyn ConnectivityProbe,
) -> Result<(Config, StorageLocation), BootstrapError> {
    let location = ensure_storage_location(&config.database.uri, &config.database.base_dir)?;
    if location.is_local() {
        return Ok((config, location));
    }

    match prober.probe(&config.database.uri).await? {
        ProbeOutcome::Reachable => {
            info!(uri = %redact_uri(&config.database.uri), "Using primary database");
            Ok((config, location))
        }
        ProbeOutcome::Unreachable { reason } => select_fallback(config, &reason),
    }
}

/// Point the config at the local store and prepare its directory
fn select_fallback(mut config: Config, reason: &str) -> Result<(Config, StorageLocation), BootstrapError> {
    let fallback = config.default_local_uri();
    let original = std::mem::replace(&mut config.database.uri, fallback);

    warn!(
        original_uri = %redact_uri(&original),
        reason = %reason,
        fallback_uri = %config.database.uri,
        "Primary database unreachable, falling back to local store"
    );

    let location = ensure_storage_location(&config.database.uri, &config.database.base_dir)?;
    Ok((config, location))
}

/// Hide the password part of a URI before it reaches the logs
pub(crate) fn redact_uri(uri: &str) -> String {
    match url::Url::parse(uri) {
        Ok(mut url) if url.password().is_some() => {
            // set_password only fails for URLs that cannot carry credentials
            if url.set_password(Some("***")).is_ok() {
                url.to_string()
            } else {
                uri.to_string()
            }
        }
        _ => uri.to_string(),
    }
}
