//! Bypass Marker Module
//!
//! A sentinel that, when found in a freshly computed result, keeps that result out of the cache.

use serde::Serialize;
use serde_json::Value;

use crate::error::{CacheError, Result};

// == Bypass Marker ==
/// Sentinel value compared against results in their encoded form.
///
/// Containment depends on the result's shape:
/// - arrays (tuples, vectors, slices): any element equals the sentinel
/// - objects (structs, maps): any field value equals the sentinel
/// - anything else: the result equals the sentinel
///
/// A result equal to the sentinel as a whole always matches.
#[derive(Debug, Clone, PartialEq)]
pub struct BypassMarker(Value);

impl BypassMarker {
    /// Creates a marker from any serializable sentinel.
    pub fn new<T: Serialize>(sentinel: T) -> Result<Self> {
        serde_json::to_value(sentinel)
            .map(Self)
            .map_err(|err| CacheError::Unserializable(format!("bypass marker: {}", err)))
    }

    /// Marker matching `None` / unit results and `None` elements.
    pub fn null() -> Self {
        Self(Value::Null)
    }

    pub fn sentinel(&self) -> &Value {
        &self.0
    }

    // == Matches ==
    /// Checks an already encoded result.
    pub fn matches(&self, result: &Value) -> bool {
        if result == &self.0 {
            return true;
        }
        match result {
            Value::Array(items) => items.iter().any(|item| item == &self.0),
            Value::Object(fields) => fields.values().any(|field| field == &self.0),
            _ => false,
        }
    }

    /// Encodes `result` and checks it.
    pub fn matches_result<V: Serialize>(&self, result: &V) -> Result<bool> {
        let encoded = serde_json::to_value(result)
            .map_err(|err| CacheError::Unserializable(format!("result: {}", err)))?;
        Ok(self.matches(&encoded))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Report {
        rows: u32,
        status: &'static str,
    }

    #[test]
    fn test_scalar_equality() {
        let marker = BypassMarker::new(-1).unwrap();
        assert!(marker.matches_result(&-1).unwrap());
        assert!(!marker.matches_result(&1).unwrap());
    }

    #[test]
    fn test_tuple_containment() {
        let marker = BypassMarker::new("NO_CACHE").unwrap();
        assert!(marker.matches_result(&(5, "NO_CACHE")).unwrap());
        assert!(!marker.matches_result(&(5, "ok")).unwrap());
    }

    #[test]
    fn test_vec_containment_is_one_level_deep() {
        let marker = BypassMarker::new(0).unwrap();
        assert!(marker.matches_result(&vec![3, 0, 7]).unwrap());
        assert!(!marker.matches_result(&vec![vec![0]]).unwrap());
    }

    #[test]
    fn test_struct_field_containment() {
        let marker = BypassMarker::new("partial").unwrap();
        let report = Report {
            rows: 3,
            status: "partial",
        };
        assert!(marker.matches_result(&report).unwrap());
    }

    #[test]
    fn test_string_is_scalar_not_substring() {
        let marker = BypassMarker::new("x").unwrap();
        assert!(!marker.matches_result(&"xyz").unwrap());
        assert!(marker.matches_result(&"x").unwrap());
    }

    #[test]
    fn test_null_marker_matches_none() {
        let marker = BypassMarker::null();
        assert!(marker.matches_result(&Option::<i32>::None).unwrap());
        assert!(marker.matches_result(&(1, Option::<i32>::None)).unwrap());
        assert!(!marker.matches_result(&Some(1)).unwrap());
    }

    #[test]
    fn test_map_values_are_checked() {
        let marker = BypassMarker::new(false).unwrap();
        let mut map = HashMap::new();
        map.insert("ready", false);
        assert!(marker.matches_result(&map).unwrap());
    }
}
