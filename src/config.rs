//! Configuration Module
//!
//! Loads default cache policy settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{CachePolicy, DEFAULT_CACHE_DIR};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for persisted snapshots
    pub cache_dir: PathBuf,
    /// Lifetime of a fresh entry in seconds
    pub expiry_secs: u64,
    /// Hits an entry may serve before recomputation
    pub max_reuse: u32,
    /// Persist stores to `cache_dir`
    pub persistent: bool,
    /// Log hits and cache writes
    pub show_log: bool,
    /// Log execution time on misses
    pub timer: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_CACHE_DIR` - Snapshot directory (default: data)
    /// - `MEMO_EXPIRY_SECS` - Entry lifetime in seconds (default: 1800)
    /// - `MEMO_MAX_REUSE` - Hits per entry (default: 0, one hit)
    /// - `MEMO_PERSISTENT` - Enable persistence (default: false)
    /// - `MEMO_SHOW_LOG` - Log hits and writes (default: false)
    /// - `MEMO_TIMER` - Log execution time (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("MEMO_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            expiry_secs: env_parse("MEMO_EXPIRY_SECS").unwrap_or(defaults.expiry_secs),
            max_reuse: env_parse("MEMO_MAX_REUSE").unwrap_or(defaults.max_reuse),
            persistent: env_flag("MEMO_PERSISTENT").unwrap_or(defaults.persistent),
            show_log: env_flag("MEMO_SHOW_LOG").unwrap_or(defaults.show_log),
            timer: env_flag("MEMO_TIMER").unwrap_or(defaults.timer),
        }
    }

    /// Builds the cache policy these settings describe.
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            expiry: Duration::from_secs(self.expiry_secs),
            persistent: self.persistent,
            cache_dir: self.cache_dir.clone(),
            max_reuse: self.max_reuse,
            show_log: self.show_log,
            timer: self.timer,
            ..CachePolicy::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            expiry_secs: 1800,
            max_reuse: 0,
            persistent: false,
            show_log: false,
            timer: false,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}
