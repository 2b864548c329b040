//! Wrappers Module
//!
//! Control-flow wrappers sharing the `call(CallArgs)` contract of `Memoized`.
//! They compose by closure, e.g. a `Memoized` whose operation calls a `Retry`.
//!
//! # Wrappers
//! - `Logged`: start/finish logging with optional timing
//! - `Retry`: bounded retries with an optional delay
//! - `NotifyOnFailure`: failure reports to notification channels

mod failure;
mod logger;
mod retry;

pub use failure::{FailureReport, Notifier, NotifyOnFailure};
pub use logger::Logged;
pub use retry::Retry;
