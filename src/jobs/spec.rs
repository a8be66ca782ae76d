//! # Scheduling parameters and the registry bundle.
//!
//! [`Schedule`] describes *when* a job runs: the gap between invocations, the
//! delay before the first one, and the [`TickPolicy`] that decides how the
//! gap is measured. [`JobSpec`] bundles a schedule with the job itself (and
//! an optional name) for [`Registry::register`](crate::Registry::register).
//!
//! Durations are `std::time::Duration`, so the non-negativity the source
//! system had to validate at construction is enforced by the type system
//! here; construction never fails.

use std::time::Duration;

use crate::jobs::job::JobRef;
use crate::policies::TickPolicy;

/// When a job runs: interval, start delay, and gap measurement policy.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use pacer::{Schedule, TickPolicy};
///
/// let schedule = Schedule::new(Duration::from_secs(30))
///     .with_start_delay(Duration::from_secs(5))
///     .with_tick_policy(TickPolicy::FixedRate);
///
/// assert_eq!(schedule.interval, Duration::from_secs(30));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Schedule {
    /// Gap between invocations. How the gap relates to the previous
    /// invocation's runtime is decided by `tick`.
    pub interval: Duration,
    /// Delay before the first invocation after `start`.
    pub start_delay: Duration,
    /// How the next wake-up is computed.
    pub tick: TickPolicy,
}

impl Schedule {
    /// Creates a schedule with the given interval, no start delay, and the
    /// default [`TickPolicy::FromCompletion`].
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            start_delay: Duration::ZERO,
            tick: TickPolicy::default(),
        }
    }

    /// Returns a new schedule with the given start delay.
    pub fn with_start_delay(mut self, start_delay: Duration) -> Self {
        self.start_delay = start_delay;
        self
    }

    /// Returns a new schedule with the given tick policy.
    pub fn with_tick_policy(mut self, tick: TickPolicy) -> Self {
        self.tick = tick;
        self
    }
}

impl Default for Schedule {
    /// One-second interval, zero start delay, gap measured from completion.
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Registration bundle for the registry: a job, its schedule, and an
/// optional name (the registry generates one when absent).
#[derive(Clone)]
pub struct JobSpec {
    name: Option<String>,
    job: JobRef,
    schedule: Schedule,
}

impl JobSpec {
    /// Creates an unnamed spec; the registry will generate a unique name.
    pub fn new(job: JobRef, schedule: Schedule) -> Self {
        Self {
            name: None,
            job,
            schedule,
        }
    }

    /// Returns a new spec with an explicit registry name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the explicit name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns a reference to the job.
    pub fn job(&self) -> &JobRef {
        &self.job
    }

    /// Returns the schedule.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub(crate) fn into_parts(self) -> (Option<String>, JobRef, Schedule) {
        (self.name, self.job, self.schedule)
    }
}
