//! Error types for the memoizing cache
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache layer itself.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Call arguments could not be canonically encoded into a cache key
    #[error("Unserializable arguments: {0}")]
    Unserializable(String),

    /// A wrapped operation asked for an argument that is missing or has the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Durable load or save failed
    #[error("Persistence error at {}: {message}", .path.display())]
    Persistence { path: PathBuf, message: String },
}

impl CacheError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        CacheError::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

// == Memo Error Enum ==
/// Error returned by a memoized call.
///
/// `Target` carries the wrapped operation's own failure untouched; `Cache`
/// means the cache refused or could not complete the call.
#[derive(Error, Debug)]
pub enum MemoError<E> {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("{0}")]
    Target(E),
}

impl<E> MemoError<E> {
    /// Returns the wrapped operation's failure, if that is what this is.
    pub fn into_target(self) -> Option<E> {
        match self {
            MemoError::Target(err) => Some(err),
            MemoError::Cache(_) => None,
        }
    }

    pub fn is_unserializable(&self) -> bool {
        matches!(self, MemoError::Cache(CacheError::Unserializable(_)))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, MemoError::Cache(CacheError::Persistence { .. }))
    }
}

// == Notify Error ==
/// Failure of a single notification channel.
#[derive(Error, Debug)]
#[error("Notification via {channel} failed: {message}")]
pub struct NotifyError {
    pub channel: String,
    pub message: String,
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_error_from_cache_error() {
        let err: MemoError<std::io::Error> = CacheError::Unserializable("bad".into()).into();
        assert!(err.is_unserializable());
        assert!(!err.is_persistence());
        assert!(err.into_target().is_none());
    }

    #[test]
    fn test_target_error_passes_through() {
        let err: MemoError<String> = MemoError::Target("boom".to_string());
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.into_target().as_deref(), Some("boom"));
    }

    #[test]
    fn test_persistence_error_message() {
        let err = CacheError::persistence("/tmp/x_cache.json", "denied");
        assert_eq!(
            err.to_string(),
            "Persistence error at /tmp/x_cache.json: denied"
        );
    }
}
