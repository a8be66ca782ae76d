//! # Job abstraction.
//!
//! This module defines the [`Job`] trait (async, cancelable). The common
//! handle type is [`JobRef`], an `Arc<dyn Job>` suitable for sharing across
//! the runtime.
//!
//! A job receives a [`CancellationToken`] and should periodically check it to
//! stop cooperatively when the executor is stopped. The token it receives is
//! the executor's run-lifetime signal: every invocation within one running
//! lifetime observes the same token instance.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;

/// Shared handle to a job.
pub type JobRef = Arc<dyn Job>;

/// # Asynchronous, cancelable unit of work.
///
/// A `Job` has a stable [`name`](Job::name) and an async [`run`](Job::run)
/// method that receives a [`CancellationToken`]. The executor invokes `run`
/// once per tick and always lets it finish; cancellation is cooperative, so
/// implementors should check the token and exit promptly during shutdown. A
/// job that never checks the token and never returns will block `stop`
/// indefinitely.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use pacer::{Job, JobError};
///
/// struct Probe;
///
/// #[async_trait]
/// impl Job for Probe {
///     fn name(&self) -> &str { "probe" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), JobError> {
///         if ctx.is_cancelled() {
///             return Err(JobError::Canceled);
///         }
///         // do work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Returns a stable, human-readable job name.
    fn name(&self) -> &str;

    /// Executes one invocation of the job.
    ///
    /// Return `Err(JobError::Canceled)` when unwinding because `ctx` was
    /// cancelled; any other error is reported to the bus and the schedule
    /// continues.
    async fn run(&self, ctx: CancellationToken) -> Result<(), JobError>;
}
