//! # Function-backed job (`JobFn`)
//!
//! [`JobFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a
//! fresh future per invocation. This avoids shared mutable state between
//! ticks; if shared state is needed, move an `Arc<...>` into the closure
//! explicitly.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use pacer::{JobFn, JobRef, JobError};
//!
//! let j: JobRef = JobFn::arc("poller", |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(JobError::Canceled);
//!     }
//!     // do work...
//!     Ok::<_, JobError>(())
//! });
//!
//! assert_eq!(j.name(), "poller");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::jobs::job::Job;

/// Function-backed job implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct JobFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> JobFn<F> {
    /// Creates a new function-backed job.
    ///
    /// Prefer [`JobFn::arc`] when you immediately need a [`JobRef`](crate::JobRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the job and returns it as a shared handle (`Arc<Self>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Job for JobFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), JobError> {
        (self.f)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobRef;

    #[tokio::test]
    async fn test_job_fn_runs_fresh_future_per_invocation() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let hits = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&hits);
        let j: JobRef = JobFn::arc("counting", move |_ctx: CancellationToken| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        assert_eq!(j.name(), "counting");
        j.run(CancellationToken::new()).await.unwrap();
        j.run(CancellationToken::new()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
