//! Cache Module
//!
//! Key derivation, per-operation stores, expiry/reuse policy and JSON persistence.

mod bypass;
mod encode;
mod entry;
mod key;
mod persist;
mod policy;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use bypass::BypassMarker;
pub use entry::{expiry_deadline, CacheEntry};
pub use key::{derive_key, is_control_flag, CacheKey, CallArgs};
pub use persist::PersistenceAdapter;
pub use policy::{CachePolicy, DEFAULT_CACHE_DIR, DEFAULT_EXPIRY};
pub use stats::CacheStats;
pub use store::{CacheStore, Lookup};

// == Public Constants ==
/// Keyword arguments starting with this prefix are control flags and never part of a key
pub const CONTROL_PREFIX: char = '_';

/// File name suffix of persisted store snapshots
pub const CACHE_FILE_SUFFIX: &str = "_cache.json";
