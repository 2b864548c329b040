//! Retry Wrapper
//!
//! Re-invokes a failing operation up to a bounded number of attempts.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::CallArgs;

// == Retry ==
/// Operation retried on failure.
pub struct Retry<F> {
    name: String,
    max_tries: u32,
    delay: Option<Duration>,
    operation: F,
}

impl<F, Fut, V, E> Retry<F>
where
    F: Fn(CallArgs) -> Fut,
    Fut: Future<Output = Result<V, E>>,
    E: Display,
{
    /// `max_tries` of 0 is treated as a single attempt.
    pub fn new(name: impl Into<String>, max_tries: u32, delay: Option<Duration>, operation: F) -> Self {
        Self {
            name: name.into(),
            max_tries: max_tries.max(1),
            delay,
            operation,
        }
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Invokes the operation until it succeeds or attempts run out.
    ///
    /// The last failure is returned unchanged.
    pub async fn call(&self, args: CallArgs) -> Result<V, E> {
        let mut attempt = 1;
        loop {
            match (self.operation)(args.clone()).await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} succeeded on attempt {}", self.name, attempt);
                    }
                    return Ok(value);
                }
                Err(err) if attempt >= self.max_tries => {
                    warn!("{} failed after {} attempts: {}", self.name, attempt, err);
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        "{} attempt {}/{} failed: {}",
                        self.name, attempt, self.max_tries, err
                    );
                    if let Some(delay) = self.delay {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
