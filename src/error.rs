//! Error types used by the pacer runtime and jobs.
//!
//! This module defines two main error enums:
//!
//! - [`JobError`] — errors raised by individual job invocations.
//! - [`RegistryError`] — errors raised by the named registry.
//!
//! A job fault ([`JobError::Fail`]) is recovered locally by the executor:
//! it is published to the event bus and the schedule continues. A
//! [`JobError::Canceled`] produced while the executor is stopping is the
//! expected shutdown outcome and is swallowed silently. Neither ever
//! propagates out of the run loop.

use thiserror::Error;

/// # Errors produced by job execution.
///
/// Returned from [`Job::run`](crate::Job::run). The executor never lets
/// these escape: faults are reported to the bus, cancellations end the
/// current run quietly.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum JobError {
    /// Job execution failed; the schedule continues and the job will run
    /// again on the next tick.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Job observed its cancellation token and unwound.
    #[error("cancelled")]
    Canceled,
}

impl JobError {
    /// Shorthand for [`JobError::Fail`] from any displayable error.
    pub fn fail(error: impl Into<String>) -> Self {
        JobError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pacer::JobError;
    ///
    /// assert_eq!(JobError::fail("boom").as_label(), "job_failed");
    /// assert_eq!(JobError::Canceled.as_label(), "job_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Fail { .. } => "job_failed",
            JobError::Canceled => "job_canceled",
        }
    }

    /// True for [`JobError::Canceled`], the cooperative-shutdown outcome.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, JobError::Canceled)
    }
}

/// # Errors produced by the named registry.
///
/// Lifecycle forwarding (`start`/`stop`) and registration are the only
/// fallible registry operations; executor misuse (double-start, double-stop)
/// is a silent no-op by design.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A job with this name is already registered.
    #[error("job {name:?} already registered")]
    NameTaken {
        /// The conflicting name.
        name: String,
    },

    /// No job with this name is registered.
    #[error("job {name:?} not found")]
    NotFound {
        /// The requested name.
        name: String,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::NameTaken { .. } => "registry_name_taken",
            RegistryError::NotFound { .. } => "registry_not_found",
        }
    }
}
