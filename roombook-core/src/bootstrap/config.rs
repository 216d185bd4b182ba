//! Configuration loading

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::Config;

const CONFIG_PATH_ENV: &str = "ROOMBOOK_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Load configuration from a config file and environment variables
///
/// Config file search order:
/// 1. Explicit path (command line)
/// 2. `ROOMBOOK_CONFIG_PATH` environment variable
/// 3. ./config.yaml (current working directory)
/// 4. Fall back to environment variables only
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config_path = resolve_config_path(explicit)?;

    let config = if let Some(path) = &config_path {
        eprintln!("Loading config from {}", path.display());
        Config::load(Some(path)).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        eprintln!("No config file found, using environment variables");
        Config::from_env().context("Failed to load config from environment")?
    };

    // Fail fast on misconfigurations. Logging is not up yet, so report on stderr.
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Config validation error: {error}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    Ok(config)
}

fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        anyhow::ensure!(path.exists(), "Config file {} does not exist", path.display());
        return Ok(Some(path.to_path_buf()));
    }

    Ok(std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .or_else(|| {
            let cwd = PathBuf::from(DEFAULT_CONFIG_FILE);
            cwd.exists().then_some(cwd)
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = load_config(Some(&tmp.path().join("missing.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_file_is_loaded_and_validated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("roombook.yaml");
        std::fs::write(
            &path,
            format!(
                "server:\n  port: 8081\ndatabase:\n  base_dir: {}\njwt:\n  secret: file-secret\ncors:\n  origins: [\"https://rooms.example\"]\n",
                tmp.path().display()
            ),
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.jwt.secret, "file-secret");
        assert_eq!(config.cors.origins, vec!["https://rooms.example".to_string()]);
        assert_eq!(config.database.base_dir, tmp.path());
    }

    #[test]
    fn test_invalid_file_fails_fast() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("roombook.yaml");
        std::fs::write(&path, "database:\n  probe_timeout_ms: 0\njwt:\n  secret: s\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("probe_timeout_ms"));
    }

    #[test]
    fn test_every_validation_error_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("roombook.yaml");
        std::fs::write(&path, "database:\n  probe_timeout_ms: 0\n  max_connections: 0\n").unwrap();

        let message = load_config(Some(&path)).unwrap_err().to_string();
        assert!(message.contains("3 error(s)"), "{message}");
        assert!(message.contains("probe_timeout_ms"));
        assert!(message.contains("max_connections"));
        assert!(message.contains("jwt.secret"));
    }
}
