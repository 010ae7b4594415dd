//! Response cache for repeated chat messages.
//!
//! [`ResponseCache`] is a bounded, time-expiring map from a normalized message
//! (trimmed, lowercased) to the [`ChatResponse`](parley_types::chat::ChatResponse)
//! produced for it. It is a pure optimization: every internal fault degrades
//! to a miss or a skipped write, never to an error.
//!
//! Expired entries are invisible to `get` immediately, but are only removed
//! by [`ResponseCache::sweep`], which [`spawn_sweeper`] runs on a fixed
//! period in the background.

mod stats;
mod store;
mod sweeper;

pub use stats::CacheStats;
pub use store::{normalize_key, ResponseCache};
pub use sweeper::spawn_sweeper;
