//! Memo Module
//!
//! The caching decorator: wraps an async operation and drives lookups,
//! recomputation, bypass and persistence against its own store.
//!
//! # Example
//! ```ignore
//! let add_one = Memoized::wrap("add_one", CachePolicy::default(), |args: CallArgs| async move {
//!     Ok::<i64, CacheError>(args.get::<i64>(0)? + 1)
//! })
//! .await;
//!
//! assert_eq!(add_one.call(CallArgs::new().arg(5)).await?, 6);
//! ```

mod memoized;

pub use memoized::Memoized;
