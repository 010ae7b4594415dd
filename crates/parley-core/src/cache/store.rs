use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use parley_types::chat::ChatResponse;
use parley_types::config::CacheConfig;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::stats::{CacheStats, Counters};
use crate::text::{preview, CACHE_PREVIEW_CHARS};

/// Internal cache failures. Logged and swallowed, never returned.
#[derive(Debug, Error)]
enum CacheFault {
    #[error("cache lock poisoned during {0}")]
    Poisoned(&'static str),
}

struct CacheEntry {
    response: ChatResponse,
    stored_at: Instant,
}

impl CacheEntry {
    /// Expired once strictly more than `ttl` has passed since storage.
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) > ttl
    }
}

/// Normalize a raw message into a cache key: trimmed and lowercased.
///
/// Returns `None` for empty or whitespace-only messages, which are never
/// looked up or stored.
pub fn normalize_key(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Bounded, time-expiring response cache.
///
/// The whole map sits behind one mutex, so the capacity check, the eviction
/// of the oldest entry and the insertion happen as a single critical section.
/// Share it across tasks with `Arc<ResponseCache>`.
///
/// Timestamps come from `tokio::time::Instant`, so paused-clock tests can
/// drive expiry deterministically.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    enabled: bool,
    ttl: Duration,
    max_size: usize,
    counters: Counters,
}

impl ResponseCache {
    /// Build a cache from its configuration section.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_limits(config.enabled, config.ttl(), config.max_size)
    }

    /// Build a cache from explicit limits. `max_size` is raised to at least 1.
    pub fn with_limits(enabled: bool, ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            enabled,
            ttl,
            max_size: max_size.max(1),
            counters: Counters::default(),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::with_limits(false, Duration::ZERO, 1)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Look up the response stored for `message`.
    ///
    /// Returns `None` when caching is disabled, the message is blank, no entry
    /// exists, the entry has outlived the TTL, or the cache hit a fault.
    pub fn get(&self, message: &str) -> Option<ChatResponse> {
        if !self.enabled {
            return None;
        }
        let key = normalize_key(message)?;

        let entries = match self.lock("get") {
            Ok(entries) => entries,
            Err(fault) => {
                self.record_fault(&fault);
                return None;
            }
        };

        match entries.get(&key) {
            Some(entry) if !entry.is_expired(Instant::now(), self.ttl) => {
                Counters::bump(&self.counters.hits);
                debug!(query = %preview(message, CACHE_PREVIEW_CHARS), "Cache hit");
                Some(entry.response.clone())
            }
            _ => {
                Counters::bump(&self.counters.misses);
                None
            }
        }
    }

    /// Store `response` under the normalized form of `message`.
    ///
    /// No-op when caching is disabled, the message is blank, or the response
    /// carries the error intent. A new key arriving at capacity first evicts
    /// the single entry with the oldest storage time; an existing key is
    /// always overwritten in place.
    pub fn put(&self, message: &str, response: &ChatResponse) {
        if !self.enabled {
            return;
        }
        let key = match normalize_key(message) {
            Some(key) if !response.is_error() => key,
            _ => {
                Counters::bump(&self.counters.rejections);
                return;
            }
        };

        let mut entries = match self.lock("put") {
            Ok(entries) => entries,
            Err(fault) => {
                self.record_fault(&fault);
                return;
            }
        };

        if entries.len() >= self.max_size && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                Counters::bump(&self.counters.evictions);
                debug!(key = %preview(&oldest, CACHE_PREVIEW_CHARS), "Evicted oldest cache entry");
            }
        }

        entries.insert(
            key,
            CacheEntry {
                response: response.clone(),
                stored_at: Instant::now(),
            },
        );
        Counters::bump(&self.counters.admissions);
        debug!(query = %preview(message, CACHE_PREVIEW_CHARS), "Cached response");
    }

    /// Remove every entry that has outlived the TTL. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let mut entries = match self.lock("sweep") {
            Ok(entries) => entries,
            Err(fault) => {
                self.record_fault(&fault);
                return 0;
            }
        };

        let before = entries.len();
        let now = Instant::now();
        let ttl = self.ttl;
        entries.retain(|_, entry| !entry.is_expired(now, ttl));
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            Counters::add(&self.counters.expirations, removed as u64);
            info!(removed, "Cleaned up expired cache entries");
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        match self.lock("len") {
            Ok(entries) => entries.len(),
            Err(fault) => {
                self.record_fault(&fault);
                // Counting does not mutate, so the recovered map is accurate.
                self.entries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        match self.lock("clear") {
            Ok(mut entries) => entries.clear(),
            Err(fault) => self.record_fault(&fault),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Acquire the map lock.
    ///
    /// A poisoned lock fails this one call and is then cleared, so a panic in
    /// one task costs a single miss instead of disabling the cache for good.
    fn lock(
        &self,
        operation: &'static str,
    ) -> Result<MutexGuard<'_, HashMap<String, CacheEntry>>, CacheFault> {
        match self.entries.lock() {
            Ok(guard) => Ok(guard),
            Err(_) => {
                self.entries.clear_poison();
                Err(CacheFault::Poisoned(operation))
            }
        }
    }

    fn record_fault(&self, fault: &CacheFault) {
        Counters::bump(&self.counters.faults);
        warn!(error = %fault, "Cache operation skipped");
    }
}
