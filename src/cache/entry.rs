//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiry and reuse bookkeeping.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A stored result together with its validity metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The value produced by the wrapped operation
    pub value: V,
    /// Instant after which the entry is no longer valid
    pub expires_at: DateTime<Utc>,
    /// Number of hits served so far
    pub reuse_count: u32,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry valid for `expiry` from `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now` - Write time
    /// * `expiry` - How long the entry stays valid
    pub fn new(value: V, now: DateTime<Utc>, expiry: Duration) -> Self {
        Self {
            value,
            expires_at: expiry_deadline(now, expiry),
            reuse_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches `expires_at`, so a zero expiry
    /// produces an entry that is already stale on the next lookup.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    // == Is Exhausted ==
    /// Checks if the entry has already served `permitted_hits` hits.
    pub fn is_exhausted(&self, permitted_hits: u32) -> bool {
        self.reuse_count >= permitted_hits
    }

    // == Time Remaining ==
    /// Returns how long the entry stays valid after `now`, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

// == Utility Functions ==
/// Adds `expiry` to `now`, saturating at the largest representable instant.
pub fn expiry_deadline(now: DateTime<Utc>, expiry: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(expiry)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Utc::now();
        let entry = CacheEntry::new("test_value".to_string(), now, Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.reuse_count, 0);
        assert_eq!(entry.expires_at, now + chrono::Duration::seconds(60));
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_entry_expiration() {
        let now = Utc::now();
        let entry = CacheEntry::new(1, now, Duration::from_secs(1));

        assert!(!entry.is_expired(now + chrono::Duration::milliseconds(999)));
        assert!(entry.is_expired(now + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_zero_expiry_is_immediately_stale() {
        let now = Utc::now();
        let entry = CacheEntry::new(1, now, Duration::ZERO);

        assert!(entry.is_expired(now));
    }

    #[test]
    fn test_exhaustion_boundary() {
        let mut entry = CacheEntry::new(1, Utc::now(), Duration::from_secs(60));

        assert!(!entry.is_exhausted(1));
        entry.reuse_count = 1;
        assert!(entry.is_exhausted(1));
        assert!(!entry.is_exhausted(2));
    }

    #[test]
    fn test_remaining() {
        let now = Utc::now();
        let entry = CacheEntry::new(1, now, Duration::from_secs(10));

        assert_eq!(entry.remaining(now), Duration::from_secs(10));
        assert_eq!(
            entry.remaining(now + chrono::Duration::seconds(30)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_huge_expiry_saturates() {
        let now = Utc::now();
        let entry = CacheEntry::new(1, now, Duration::from_secs(u64::MAX));

        assert_eq!(entry.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!entry.is_expired(now));
    }
}
