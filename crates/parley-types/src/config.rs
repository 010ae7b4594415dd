//! Configuration types for Parley.
//!
//! `ParleyConfig` represents the top-level `config.toml`: where the reply
//! backend lives and how the response cache behaves. Every field has a
//! default so an empty (or missing) file yields a working setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound for the backend request timeout (one day).
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Upper bound for the cache TTL and sweep period (one year).
pub const MAX_DURATION_MINUTES: u64 = 365 * 24 * 60;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// SQLite URL override. When absent the database lives in the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl ParleyConfig {
    /// Clamp values that would make the system unusable.
    ///
    /// A zero-capacity cache, a zero timeout, or a zero sweep period are all
    /// raised to 1. Durations are capped so deadline arithmetic on them
    /// cannot overflow.
    pub fn with_floors(mut self) -> Self {
        self.backend.timeout_secs = self.backend.timeout_secs.clamp(1, MAX_TIMEOUT_SECS);
        self.cache.max_size = self.cache.max_size.max(1);
        self.cache.ttl_minutes = self.cache.ttl_minutes.min(MAX_DURATION_MINUTES);
        self.cache.sweep_interval_minutes =
            self.cache.sweep_interval_minutes.clamp(1, MAX_DURATION_MINUTES);
        self
    }
}

/// Where and how to reach the reply-generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_analyze_path")]
    pub analyze_path: String,

    /// Per-request network timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            analyze_path: default_analyze_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Response cache tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,

    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// Period of the background sweep that drops expired entries.
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.saturating_mul(60))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_minutes: default_ttl_minutes(),
            max_size: default_max_size(),
            sweep_interval_minutes: default_sweep_interval_minutes(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_analyze_path() -> String {
    "/analyze".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_enabled() -> bool {
    true
}

fn default_ttl_minutes() -> u64 {
    60
}

fn default_max_size() -> usize {
    500
}

fn default_sweep_interval_minutes() -> u64 {
    10
}
