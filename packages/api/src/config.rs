//! Client configuration from `notes.toml` plus environment overrides.
//!
//! Lookup order:
//! 1. `.env` in the working directory (via `dotenvy`), if present.
//! 2. The TOML file named by `NOTES_CONFIG`, default [`ClientConfig::filename`].
//!    A missing file means defaults.
//! 3. `NOTES_PROJECT_ID` and `NOTES_API_KEY` override the `[backend]` section.

use std::path::{Path, PathBuf};

use store::ClientConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let path = std::env::var("NOTES_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(ClientConfig::filename()));

    load_config_from(&path, |key| std::env::var(key).ok())
}

/// Load configuration from `path`, resolving overrides through `env`.
pub fn load_config_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ConfigError> {
    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => ClientConfig::from_toml(&contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            ClientConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(project_id) = env("NOTES_PROJECT_ID") {
        config.backend.project_id = project_id;
    }
    if let Some(api_key) = env("NOTES_API_KEY") {
        config.backend.api_key = api_key;
    }

    config.validate().map_err(ConfigError::Invalid)?;
    tracing::debug!(project_id = %config.backend.project_id, "config loaded");
    Ok(config)
}
