//! # Function-backed blocking job (`BlockingJobFn`)
//!
//! [`BlockingJobFn`] is the synchronous flavor of [`JobFn`](crate::JobFn):
//! it wraps a plain (non-async) closure and executes it on tokio's blocking
//! pool via [`tokio::task::spawn_blocking`], so a long-running synchronous
//! body never stalls the async runtime.
//!
//! Cancellation stays cooperative: the closure receives the executor's
//! [`CancellationToken`] and should poll `is_cancelled()` at convenient
//! points. A closure that ignores the token simply runs to completion before
//! `stop` returns.
//!
//! ## Example
//! ```rust
//! use pacer::{BlockingJobFn, JobError, JobRef};
//! use tokio_util::sync::CancellationToken;
//!
//! let j: JobRef = BlockingJobFn::arc("compactor", |ctx: CancellationToken| {
//!     for _chunk in 0..64 {
//!         if ctx.is_cancelled() {
//!             return Err(JobError::Canceled);
//!         }
//!         // crunch one chunk...
//!     }
//!     Ok(())
//! });
//! assert_eq!(j.name(), "compactor");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::jobs::job::Job;

/// Function-backed job executing a synchronous closure on the blocking pool.
pub struct BlockingJobFn<F> {
    name: Cow<'static, str>,
    f: Arc<F>,
}

impl<F> BlockingJobFn<F> {
    /// Creates a new blocking job.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Creates the job and returns it as a shared handle (`Arc<Self>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F> Job for BlockingJobFn<F>
where
    F: Fn(CancellationToken) -> Result<(), JobError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), JobError> {
        let f = Arc::clone(&self.f);
        match task::spawn_blocking(move || f(ctx)).await {
            Ok(res) => res,
            Err(join) if join.is_panic() => Err(JobError::fail("blocking job panicked")),
            Err(_) => Err(JobError::Canceled),
        }
    }
}
