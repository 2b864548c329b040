//! Logging Wrapper
//!
//! Logs start and finish of an operation, optionally with its elapsed time.

use std::future::Future;
use std::time::Instant;

use tracing::info;

use crate::cache::CallArgs;

// == Logged ==
/// Operation that logs around each invocation.
pub struct Logged<F> {
    name: String,
    timer: bool,
    operation: F,
}

impl<F, Fut, V, E> Logged<F>
where
    F: Fn(CallArgs) -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    pub fn new(name: impl Into<String>, timer: bool, operation: F) -> Self {
        Self {
            name: name.into(),
            timer,
            operation,
        }
    }

    /// Invokes the operation. "Finished" is only logged on success.
    pub async fn call(&self, args: CallArgs) -> Result<V, E> {
        info!("Started executing {}", self.name);
        let started = Instant::now();

        let value = (self.operation)(args).await?;

        info!("Finished executing {}", self.name);
        if self.timer {
            info!("Execution time: {} seconds", started.elapsed().as_secs_f64());
        }
        Ok(value)
    }
}
