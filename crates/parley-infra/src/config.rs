//! Configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production),
//! layers `PARLEY_*` environment overrides on top, and applies the value
//! floors. Falls back to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use parley_types::config::ParleyConfig;

pub const ENV_DATA_DIR: &str = "PARLEY_DATA_DIR";
pub const ENV_BACKEND_URL: &str = "PARLEY_BACKEND_URL";
pub const ENV_BACKEND_PATH: &str = "PARLEY_BACKEND_PATH";
pub const ENV_BACKEND_TIMEOUT_SECS: &str = "PARLEY_BACKEND_TIMEOUT_SECS";
pub const ENV_CACHE_ENABLED: &str = "PARLEY_CACHE_ENABLED";

/// Load configuration from `{data_dir}/config.toml` plus process environment.
pub async fn load_config(data_dir: &Path) -> ParleyConfig {
    let file_config = read_config_file(data_dir).await;
    apply_overrides(file_config, |key| std::env::var(key).ok()).with_floors()
}

/// Read and parse `{data_dir}/config.toml` without overrides or floors.
///
/// - Missing file: returns [`ParleyConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn read_config_file(data_dir: &Path) -> ParleyConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
    };

    match toml::from_str::<ParleyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ParleyConfig::default()
        }
    }
}

/// Apply `PARLEY_*` overrides read through `lookup`.
///
/// Values that fail to parse are ignored with a warning.
pub fn apply_overrides(
    mut config: ParleyConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ParleyConfig {
    if let Some(url) = lookup(ENV_BACKEND_URL) {
        config.backend.base_url = url;
    }
    if let Some(path) = lookup(ENV_BACKEND_PATH) {
        config.backend.analyze_path = path;
    }
    if let Some(raw) = lookup(ENV_BACKEND_TIMEOUT_SECS) {
        match raw.trim().parse::<u64>() {
            Ok(secs) => config.backend.timeout_secs = secs,
            Err(_) => tracing::warn!("Ignoring {ENV_BACKEND_TIMEOUT_SECS}={raw}: not a number"),
        }
    }
    if let Some(raw) = lookup(ENV_CACHE_ENABLED) {
        match parse_flag(&raw) {
            Some(enabled) => config.cache.enabled = enabled,
            None => tracing::warn!("Ignoring {ENV_CACHE_ENABLED}={raw}: expected true or false"),
        }
    }
    config
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLEY_DATA_DIR` environment variable
/// 2. `~/.parley`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    // Last resort: current directory
    PathBuf::from(".parley")
}
