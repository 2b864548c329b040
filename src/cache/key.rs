//! Cache Key Module
//!
//! Call arguments and the deterministic key derived from them.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::encode::{canonical, encode};
use crate::cache::CONTROL_PREFIX;
use crate::error::{CacheError, Result};

// == Cache Key ==
/// Opaque identifier for one call signature of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Call Args ==
/// Positional and keyword arguments of a single call.
///
/// Values are encoded eagerly and non-finite floats are refused, so the
/// operation always reads back exactly what was passed. The first encoding
/// failure is kept and
/// reported when the key is derived, so a call with unencodable arguments
/// never reaches the wrapped operation.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: BTreeMap<String, Value>,
    rejected: Option<String>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    // == Builders ==
    /// Appends a positional argument.
    pub fn arg<T: Serialize>(mut self, value: T) -> Self {
        match encode(&value) {
            Ok(encoded) => self.positional.push(encoded),
            Err(err) => {
                let index = self.positional.len();
                self.reject(format!("positional argument {}: {}", index, err));
            }
        }
        self
    }

    /// Sets a keyword argument, replacing any earlier value under the same name.
    pub fn kwarg<T: Serialize>(mut self, name: impl Into<String>, value: T) -> Self {
        let name = name.into();
        match encode(&value) {
            Ok(encoded) => {
                self.keyword.insert(name, encoded);
            }
            Err(err) => self.reject(format!("keyword argument '{}': {}", name, err)),
        }
        self
    }

    fn reject(&mut self, reason: String) {
        self.rejected.get_or_insert(reason);
    }

    // == Accessors ==
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &BTreeMap<String, Value> {
        &self.keyword
    }

    /// Decodes the positional argument at `index`.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let value = self.positional.get(index).ok_or_else(|| {
            CacheError::InvalidArgument(format!("missing positional argument {}", index))
        })?;
        serde_json::from_value(value.clone()).map_err(|err| {
            CacheError::InvalidArgument(format!("positional argument {}: {}", index, err))
        })
    }

    /// Decodes the keyword argument `name`, or `None` when it was not passed.
    pub fn get_kwarg<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.keyword.get(name) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| {
                    CacheError::InvalidArgument(format!("keyword argument '{}': {}", name, err))
                }),
            None => Ok(None),
        }
    }

    /// True when keyword argument `name` was passed as boolean `true`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.keyword.get(name), Some(Value::Bool(true)))
    }

    // == Key ==
    /// Derives the cache key of this call for `operation_id`.
    pub fn cache_key(&self, operation_id: &str) -> Result<CacheKey> {
        if let Some(reason) = &self.rejected {
            return Err(CacheError::Unserializable(reason.clone()));
        }
        derive_key(operation_id, &self.positional, &self.keyword)
    }
}

/// Returns true for keyword names reserved for call-time control flags.
pub fn is_control_flag(name: &str) -> bool {
    name.starts_with(CONTROL_PREFIX)
}

// == Derive Key ==
/// Builds the canonical key for a call.
///
/// The encoding is the compact JSON text of
/// `(operation_id, positional, keyword)` with control flags dropped from
/// `keyword`. Object keys are re-sorted at every depth before encoding, so
/// neither keyword order nor map iteration order changes the key.
pub fn derive_key(
    operation_id: &str,
    positional: &[Value],
    keyword: &BTreeMap<String, Value>,
) -> Result<CacheKey> {
    let positional: Vec<Value> = positional.iter().cloned().map(canonical).collect();
    let identity: BTreeMap<&str, Value> = keyword
        .iter()
        .filter(|(name, _)| !is_control_flag(name))
        .map(|(name, value)| (name.as_str(), canonical(value.clone())))
        .collect();

    serde_json::to_string(&(operation_id, positional, identity))
        .map(CacheKey)
        .map_err(|err| CacheError::Unserializable(err.to_string()))
}
