//! Failure Notification Wrapper
//!
//! Forwards a report of every failure to configured notification channels,
//! then returns the original failure unchanged.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::cache::CallArgs;
use crate::error::NotifyError;

// == Failure Report ==
/// What a channel receives when an operation fails.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    pub operation: String,
    pub subject: String,
    pub body: String,
}

impl FailureReport {
    pub fn new<E: Display + Debug>(operation: &str, err: &E) -> Self {
        Self {
            operation: operation.to_string(),
            subject: format!("{} failed", operation),
            body: format!("Error: {}\n\nDetails:\n{:?}", err, err),
        }
    }
}

// == Notifier ==
/// A notification channel such as an email sender or a chat webhook.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name used in logs.
    fn channel(&self) -> &str;

    async fn notify(&self, report: &FailureReport) -> Result<(), NotifyError>;
}

// == Notify On Failure ==
/// Operation that reports its failures before returning them.
pub struct NotifyOnFailure<F> {
    name: String,
    notifiers: Vec<Arc<dyn Notifier>>,
    show_log: bool,
    operation: F,
}

impl<F, Fut, V, E> NotifyOnFailure<F>
where
    F: Fn(CallArgs) -> Fut,
    Fut: Future<Output = Result<V, E>>,
    E: Display + Debug,
{
    pub fn new(name: impl Into<String>, notifiers: Vec<Arc<dyn Notifier>>, operation: F) -> Self {
        Self {
            name: name.into(),
            notifiers,
            show_log: false,
            operation,
        }
    }

    pub fn show_log(mut self, enabled: bool) -> Self {
        self.show_log = enabled;
        self
    }

    /// Invokes the operation; on failure every channel is notified in order.
    ///
    /// A channel that fails to deliver is logged and skipped.
    pub async fn call(&self, args: CallArgs) -> Result<V, E> {
        let err = match (self.operation)(args).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let report = FailureReport::new(&self.name, &err);
        for notifier in &self.notifiers {
            if self.show_log {
                info!("Notifying {} via {}", report.subject, notifier.channel());
            }
            if let Err(notify_err) = notifier.notify(&report).await {
                warn!("{}", notify_err);
            }
        }
        Err(err)
    }
}
