//! Cache Policy Module
//!
//! Expiry, reuse, persistence and logging options fixed when an operation is wrapped.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::BypassMarker;

// == Public Constants ==
/// Default lifetime of a fresh entry
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(30 * 60);

/// Default directory for persisted snapshots
pub const DEFAULT_CACHE_DIR: &str = "data";

// == Cache Policy ==
/// Options for one wrapped operation.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// How long a fresh entry remains valid
    pub expiry: Duration,
    /// Load the store at wrap time and rewrite it on every cache-writing miss
    pub persistent: bool,
    /// Directory holding persisted snapshots
    pub cache_dir: PathBuf,
    /// Hits an entry may serve before recomputation; 0 behaves like 1
    pub max_reuse: u32,
    /// Results containing this sentinel are returned but not cached
    pub bypass: Option<BypassMarker>,
    /// Log hits and cache writes
    pub show_log: bool,
    /// Log execution time of the wrapped operation on a miss
    pub timer: bool,
    /// Return save failures to the caller instead of only logging them
    pub strict_persistence: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            expiry: DEFAULT_EXPIRY,
            persistent: false,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            max_reuse: 0,
            bypass: None,
            show_log: false,
            timer: false,
            strict_persistence: false,
        }
    }
}

impl CachePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Enables persistence under `cache_dir`.
    pub fn persist_in(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.persistent = true;
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_max_reuse(mut self, max_reuse: u32) -> Self {
        self.max_reuse = max_reuse;
        self
    }

    /// Lets entries serve hits until they expire.
    pub fn unlimited_reuse(self) -> Self {
        self.with_max_reuse(u32::MAX)
    }

    pub fn with_bypass(mut self, marker: BypassMarker) -> Self {
        self.bypass = Some(marker);
        self
    }

    pub fn show_log(mut self, enabled: bool) -> Self {
        self.show_log = enabled;
        self
    }

    pub fn timer(mut self, enabled: bool) -> Self {
        self.timer = enabled;
        self
    }

    pub fn strict_persistence(mut self, enabled: bool) -> Self {
        self.strict_persistence = enabled;
        self
    }

    /// Number of hits a fresh entry may serve.
    pub fn permitted_hits(&self) -> u32 {
        self.max_reuse.max(1)
    }
}
