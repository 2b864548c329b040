//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from a shared store.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically drops expired entries.
///
/// Only memory is touched; a persistent operation's snapshot is rewritten on
/// its next cache-writing miss.
///
/// # Arguments
/// * `store` - Shared store, usually from `Memoized::store_handle`
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(memo.store_handle(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<V>(store: Arc<Mutex<CacheStore<V>>>, interval: Duration) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!("Starting expiry sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.lock().await;
                guard.cleanup_expired(Utc::now())
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
