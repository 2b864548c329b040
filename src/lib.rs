//! Memocache - a memoizing result cache
//!
//! Wraps async operations so repeated calls with the same arguments reuse a
//! stored result, bounded by expiry time and reuse count, with optional JSON
//! persistence per operation.

pub mod cache;
pub mod config;
pub mod error;
pub mod memo;
pub mod tasks;
pub mod wrappers;

pub use cache::{BypassMarker, CachePolicy, CacheStats, CallArgs, PersistenceAdapter};
pub use config::Config;
pub use error::{CacheError, MemoError, NotifyError, Result};
pub use memo::Memoized;
pub use tasks::spawn_sweep_task;
