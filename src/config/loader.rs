use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{AppConfig, RawAppConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawAppConfig`.
///
/// This only performs TOML deserialization; it does **not** apply environment
/// overrides or semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawAppConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawAppConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load the application config, apply environment overrides and validate.
///
/// - A missing file falls back to built-in defaults.
/// - `AUTH_USERNAME`, `AUTH_PASSWORD` and `DB_PATH` override the file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let mut raw = if path.exists() {
        load_from_path(path)?
    } else {
        info!(path = %path.display(), "config file not found; using defaults");
        RawAppConfig::default()
    };

    apply_env_overrides(&mut raw, |key| std::env::var(key).ok());

    AppConfig::try_from(raw)
}

/// Overlay environment-provided values onto a raw config.
///
/// The lookup is injected so tests don't have to mutate the process
/// environment.
pub fn apply_env_overrides<F>(raw: &mut RawAppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(username) = lookup("AUTH_USERNAME") {
        raw.auth.username = username;
    }
    if let Some(password) = lookup("AUTH_PASSWORD") {
        raw.auth.password = password;
    }
    if let Some(db) = lookup("DB_PATH") {
        raw.store.database = PathBuf::from(db);
    }
}
