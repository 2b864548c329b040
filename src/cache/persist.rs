//! Persistence Adapter Module
//!
//! Load-at-wrap / save-on-write JSON snapshots, one file per operation.
//!
//! Snapshots assume a single writer per operation. Two processes sharing a
//! cache directory overwrite each other's files; the last rename wins.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStore, CACHE_FILE_SUFFIX};
use crate::error::{CacheError, Result};

// == Snapshot Layout ==
#[derive(Serialize)]
struct SnapshotRef<'a, V> {
    store_id: &'a str,
    saved_at: DateTime<Utc>,
    entries: &'a HashMap<CacheKey, CacheEntry<V>>,
}

#[derive(Deserialize)]
struct Snapshot<V> {
    #[allow(dead_code)]
    store_id: String,
    #[allow(dead_code)]
    saved_at: DateTime<Utc>,
    entries: HashMap<CacheKey, CacheEntry<V>>,
}

// == Persistence Adapter ==
/// Reads and writes store snapshots under one directory.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter {
    dir: PathBuf,
}

impl PersistenceAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // == Path For ==
    /// Snapshot file for `store_id`.
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced by `_`, so
    /// `jobs::fetch` is stored as `jobs__fetch_cache.json`.
    pub fn path_for(&self, store_id: &str) -> PathBuf {
        let stem: String = store_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}{}", stem, CACHE_FILE_SUFFIX))
    }

    // == Load ==
    /// Loads the store for `store_id`.
    ///
    /// A missing snapshot yields an empty store; an unreadable or corrupt one
    /// yields a `Persistence` error.
    pub async fn load<V: DeserializeOwned>(&self, store_id: &str) -> Result<CacheStore<V>> {
        let path = self.path_for(store_id);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", path.display());
                return Ok(CacheStore::new());
            }
            Err(err) => return Err(CacheError::persistence(&path, err)),
        };

        let snapshot: Snapshot<V> =
            serde_json::from_slice(&bytes).map_err(|err| CacheError::persistence(&path, err))?;

        debug!(
            "Loaded {} entries for {} from {}",
            snapshot.entries.len(),
            store_id,
            path.display()
        );
        Ok(CacheStore::from_entries(snapshot.entries))
    }

    // == Save ==
    /// Rewrites the whole snapshot for `store_id`.
    ///
    /// The snapshot is written to a sibling temp file and renamed into place.
    pub async fn save<V: Serialize>(&self, store_id: &str, store: &CacheStore<V>) -> Result<()> {
        let path = self.path_for(store_id);

        let snapshot = SnapshotRef {
            store_id,
            saved_at: Utc::now(),
            entries: store.entries(),
        };
        let bytes =
            serde_json::to_vec(&snapshot).map_err(|err| CacheError::persistence(&path, err))?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| CacheError::persistence(&self.dir, err))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .map_err(|err| CacheError::persistence(&tmp, err))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|err| CacheError::persistence(&path, err))?;

        debug!("Saved {} entries to {}", store.len(), path.display());
        Ok(())
    }

    // == Flush ==
    /// Deletes every snapshot in the directory.
    ///
    /// Returns the number of files removed; a missing directory counts as zero.
    pub async fn flush(&self) -> Result<usize> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(CacheError::persistence(&self.dir, err)),
        };

        let mut removed = 0;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|err| CacheError::persistence(&self.dir, err))?
        {
            let path = entry.path();
            let is_snapshot = path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.ends_with(CACHE_FILE_SUFFIX));
            if is_snapshot {
                fs::remove_file(&path)
                    .await
                    .map_err(|err| CacheError::persistence(&path, err))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
