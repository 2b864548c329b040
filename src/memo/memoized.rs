//! Memoized Operation
//!
//! Wraps an async operation with a per-operation cache store.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{
    CacheEntry, CachePolicy, CacheStats, CacheStore, CallArgs, Lookup, PersistenceAdapter,
};
use crate::error::{MemoError, Result};

// == Memoized ==
/// An operation whose results are cached per call signature.
///
/// The store sits behind one async mutex held from lookup through write, so
/// at most one invocation of the wrapped operation runs at a time and two
/// concurrent misses for the same key never both invoke it.
///
/// The mutex is also held while the operation runs. An operation that calls
/// its own `Memoized` (recursion through the cache) waits on itself forever.
pub struct Memoized<F, V> {
    /// Operation identity, used in keys and in the snapshot file name
    name: String,
    policy: CachePolicy,
    /// Present when the policy is persistent
    persistence: Option<PersistenceAdapter>,
    store: Arc<Mutex<CacheStore<V>>>,
    operation: F,
}

impl<F, Fut, V, E> Memoized<F, V>
where
    F: Fn(CallArgs) -> Fut,
    Fut: Future<Output = std::result::Result<V, E>>,
    V: Clone + Serialize + DeserializeOwned,
{
    // == Wrap ==
    /// Wraps `operation` under `name`.
    ///
    /// With a persistent policy the saved store is loaded here, once. An
    /// unreadable snapshot is logged and replaced by an empty store.
    pub async fn wrap(name: impl Into<String>, policy: CachePolicy, operation: F) -> Self {
        let name = name.into();

        let (persistence, store) = if policy.persistent {
            let adapter = PersistenceAdapter::new(policy.cache_dir.clone());
            let store = match adapter.load(&name).await {
                Ok(store) => store,
                Err(err) => {
                    warn!("Starting {} with an empty cache: {}", name, err);
                    CacheStore::new()
                }
            };
            (Some(adapter), store)
        } else {
            (None, CacheStore::new())
        };

        Self::build(name, policy, persistence, store, operation)
    }

    /// Wraps `operation` around an existing store, skipping the initial load.
    pub fn with_store(
        name: impl Into<String>,
        policy: CachePolicy,
        store: CacheStore<V>,
        operation: F,
    ) -> Self {
        let persistence = policy
            .persistent
            .then(|| PersistenceAdapter::new(policy.cache_dir.clone()));
        Self::build(name.into(), policy, persistence, store, operation)
    }

    fn build(
        name: String,
        policy: CachePolicy,
        persistence: Option<PersistenceAdapter>,
        store: CacheStore<V>,
        operation: F,
    ) -> Self {
        debug!(
            "Wrapped {} (expiry={:?}, max_reuse={}, persistent={}, entries={})",
            name,
            policy.expiry,
            policy.max_reuse,
            policy.persistent,
            store.len()
        );
        Self {
            name,
            policy,
            persistence,
            store: Arc::new(Mutex::new(store)),
            operation,
        }
    }

    // == Call ==
    /// Returns the cached result for `args`, or invokes the operation.
    ///
    /// Failures of the operation are returned as `MemoError::Target` and
    /// never cached. Results carrying the bypass marker are returned without
    /// being cached, as are results the marker check cannot encode.
    pub async fn call(&self, args: CallArgs) -> std::result::Result<V, MemoError<E>> {
        let key = args.cache_key(&self.name)?;
        let mut store = self.store.lock().await;

        if let Lookup::Hit(value) = store.reuse_and_check(&key, Utc::now(), self.policy.max_reuse)
        {
            if self.policy.show_log {
                info!("Cache hit for function {}", self.name);
            }
            return Ok(value);
        }

        let started = Instant::now();
        let outcome = (self.operation)(args).await;
        let elapsed = started.elapsed();

        let value = match outcome {
            Ok(value) => value,
            Err(err) => {
                store.stats_mut().record_failure();
                debug!("{} failed after {:?}, nothing cached", self.name, elapsed);
                return Err(MemoError::Target(err));
            }
        };

        if let Some(marker) = &self.policy.bypass {
            match marker.matches_result(&value) {
                Ok(false) => {}
                Ok(true) => {
                    store.stats_mut().record_bypass();
                    if self.policy.show_log {
                        info!("Bypass marker returned by {}, result not cached", self.name);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    store.stats_mut().record_bypass();
                    warn!(
                        "Result of {} cannot be checked for the bypass marker, not cached: {}",
                        self.name, err
                    );
                    return Ok(value);
                }
            }
        }

        store.put(key, CacheEntry::new(value.clone(), Utc::now(), self.policy.expiry));
        if self.policy.show_log {
            info!("Caching results for function {}", self.name);
        }
        if self.policy.timer {
            info!("Execution time: {} seconds", elapsed.as_secs_f64());
        }

        if let Some(adapter) = &self.persistence {
            if let Err(err) = adapter.save(&self.name, &store).await {
                store.stats_mut().record_persist_error();
                warn!("Failed to persist cache for {}: {}", self.name, err);
                if self.policy.strict_persistence {
                    return Err(err.into());
                }
            }
        }

        Ok(value)
    }

    // == Invalidate ==
    /// Drops the entry for `args`. Returns true if one existed.
    ///
    /// Persisted snapshots are rewritten on the next cache-writing miss.
    pub async fn invalidate(&self, args: &CallArgs) -> Result<bool> {
        let key = args.cache_key(&self.name)?;
        Ok(self.store.lock().await.remove(&key).is_some())
    }

    // == Clear ==
    /// Drops every entry, and rewrites the snapshot when persistent.
    pub async fn clear(&self) -> Result<()> {
        let mut store = self.store.lock().await;
        store.clear();
        match &self.persistence {
            Some(adapter) => adapter.save(&self.name, &store).await,
            None => Ok(()),
        }
    }
}

impl<F, V> Memoized<F, V> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Snapshot file used by this operation, when persistent.
    pub fn persist_path(&self) -> Option<PathBuf> {
        self.persistence
            .as_ref()
            .map(|adapter| adapter.path_for(&self.name))
    }

    /// Shared handle to the store, for background sweeping or inspection.
    pub fn store_handle(&self) -> Arc<Mutex<CacheStore<V>>> {
        self.store.clone()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }
}
