//! Cache Store Module
//!
//! Per-operation mapping from call key to entry, with expiry and reuse checks.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats};

// == Lookup ==
/// Outcome of [`CacheStore::reuse_and_check`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    /// Live entry; carries a copy of the stored value
    Hit(V),
    /// An entry existed but was expired or reuse-exhausted; it has been removed
    Stale,
    /// No entry for the key
    Miss,
}

impl<V> Lookup<V> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

// == Cache Store ==
/// Entries of one wrapped operation.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-entry storage
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// Lookup and write statistics
    stats: CacheStats,
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    /// Creates a store from previously saved entries.
    pub fn from_entries(entries: HashMap<CacheKey, CacheEntry<V>>) -> Self {
        let mut stats = CacheStats::new();
        stats.set_total_entries(entries.len());
        Self { entries, stats }
    }

    // == Lookup ==
    /// Returns the entry for `key` without touching any bookkeeping.
    pub fn lookup(&self, key: &CacheKey) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Put ==
    /// Stores `entry` under `key`, replacing any previous entry.
    pub fn put(&mut self, key: CacheKey, entry: CacheEntry<V>) {
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Remove ==
    /// Removes the entry for `key`. An absent key is not an error.
    pub fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry<V>> {
        let removed = self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Reuse And Check ==
    /// Looks up `key` at `now` and applies the expiry and reuse policy.
    ///
    /// An entry serves at most `max(1, max_reuse)` hits. Each hit increments
    /// its `reuse_count`; once the count reaches the bound, or `now` reaches
    /// `expires_at`, the entry is removed and reported as stale.
    ///
    /// # Arguments
    /// * `key` - The key to check
    /// * `now` - Lookup time
    /// * `max_reuse` - Configured reuse limit
    pub fn reuse_and_check(&mut self, key: &CacheKey, now: DateTime<Utc>, max_reuse: u32) -> Lookup<V>
    where
        V: Clone,
    {
        let permitted_hits = max_reuse.max(1);

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return Lookup::Miss;
        };

        if entry.is_expired(now) || entry.is_exhausted(permitted_hits) {
            debug!(
                "Stale entry for {} (expired={}, reuse_count={})",
                key,
                entry.is_expired(now),
                entry.reuse_count
            );
            self.entries.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_stale();
            return Lookup::Stale;
        }

        entry.reuse_count += 1;
        self.stats.record_hit();
        Lookup::Hit(entry.value.clone())
    }

    // == Cleanup Expired ==
    /// Removes all entries expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    // == Clear ==
    /// Drops every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// All entries, keyed by call key.
    pub fn entries(&self) -> &HashMap<CacheKey, CacheEntry<V>> {
        &self.entries
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
