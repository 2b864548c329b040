//! Cache Statistics Module
//!
//! Tracks lookup outcomes and write-path events for one store.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups with no entry for the key
    pub misses: u64,
    /// Lookups that found an expired or reuse-exhausted entry
    pub stale: u64,
    /// Results not cached because they carried the bypass marker
    pub bypassed: u64,
    /// Wrapped-operation failures (never cached)
    pub failures: u64,
    /// Snapshot writes that failed
    pub persist_errors: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses + stale), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.stale;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_stale(&mut self) {
        self.stale += 1;
    }

    pub fn record_bypass(&mut self) {
        self.bypassed += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn record_persist_error(&mut self) {
        self.persist_errors += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
