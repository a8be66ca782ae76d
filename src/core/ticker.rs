//! # The run loop: one invocation at a time.
//!
//! Drives a single job on its schedule. Invocations are strictly
//! serialized: the loop invokes the job, waits for it to finish, computes
//! the next delay from the *current* interval, then sleeps. Non-overlap is
//! structural, not lock-enforced.
//!
//! ## Flow
//! ```text
//! run_loop:
//!   sleep(start_delay)            (cancellable)
//!   loop {
//!     ├─► check token             → break if cancelled
//!     ├─► run_once()              → publish TickStarting
//!     │       │                     job.run(token) — never aborted mid-flight
//!     │       ├─ Ok               → publish TickCompleted
//!     │       ├─ Err(Canceled)    → break silently if token cancelled (no rearm)
//!     │       └─ Err(fault)       → publish TickFaulted, schedule continues
//!     ├─► delay = tick_policy(interval, elapsed)
//!     ├─► publish TickScheduled
//!     └─► sleep(delay)            (cancellable)
//!   }
//! ```
//!
//! ## Rules
//! - The token passed to the job is the run-lifetime signal itself, so every
//!   invocation of one running lifetime observes the same instance.
//! - The interval is re-read on every scheduling decision; a mutation made
//!   during an invocation applies to the upcoming gap, never to an armed
//!   wait.
//! - Cancellation wins sleep races (`biased`), so a stop racing a pending
//!   wake-up suppresses the next invocation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::{JobRef, Schedule};
use crate::policies::TickPolicy;

/// Converts a duration to saturating nanoseconds for atomic storage.
pub(crate) fn to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// State shared between an executor handle and its spawned run loop.
///
/// The interval lives here as atomic nanoseconds so `set_interval` is sync
/// and lock-free while the loop re-reads it each cycle.
pub(crate) struct Shared {
    job: JobRef,
    interval_nanos: AtomicU64,
    tick: TickPolicy,
    bus: Bus,
}

impl Shared {
    pub(crate) fn new(job: JobRef, schedule: &Schedule, bus: Bus) -> Self {
        Self {
            job,
            interval_nanos: AtomicU64::new(to_nanos(schedule.interval)),
            tick: schedule.tick,
            bus,
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos.load(Ordering::Relaxed))
    }

    pub(crate) fn set_interval(&self, interval: Duration) {
        self.interval_nanos
            .store(to_nanos(interval), Ordering::Relaxed);
    }

    pub(crate) fn job_name(&self) -> &str {
        self.job.name()
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }
}

/// Runs the schedule until the token is cancelled.
///
/// Spawned by [`PeriodicExecutor::start`](crate::PeriodicExecutor::start);
/// `stop` cancels the token and joins this task.
pub(crate) async fn run_loop(shared: Arc<Shared>, token: CancellationToken, start_delay: Duration) {
    if !sleep_cancellable(&token, start_delay).await {
        return;
    }

    let mut tick: u64 = 0;
    loop {
        if token.is_cancelled() {
            break;
        }
        tick += 1;

        let started = Instant::now();
        if run_once(&shared, &token, tick).await.is_err() {
            break;
        }
        let elapsed = started.elapsed();

        if token.is_cancelled() {
            break;
        }
        let delay = shared.tick.next_delay(shared.interval(), elapsed);
        shared.bus.publish(
            Event::new(EventKind::TickScheduled)
                .with_job(shared.job_name())
                .with_tick(tick)
                .with_delay(delay),
        );
        if !sleep_cancellable(&token, delay).await {
            break;
        }
    }
}

/// Executes a single invocation, publishing tick events.
///
/// Faults are recovered here: a non-cancellation error is published as
/// [`EventKind::TickFaulted`] and reported as `Ok` so the schedule
/// continues. The only `Err` is the expected stop-cancellation, which tells
/// the loop to exit without rearming.
async fn run_once(shared: &Shared, token: &CancellationToken, tick: u64) -> Result<(), JobError> {
    shared.bus.publish(
        Event::new(EventKind::TickStarting)
            .with_job(shared.job_name())
            .with_tick(tick),
    );

    match shared.job.run(token.clone()).await {
        Ok(()) => {
            publish_completed(shared, tick);
            Ok(())
        }
        Err(JobError::Canceled) if token.is_cancelled() => Err(JobError::Canceled),
        Err(JobError::Canceled) => {
            // Cancellation unrelated to a stop: a graceful early exit.
            publish_completed(shared, tick);
            Ok(())
        }
        Err(e) => {
            shared.bus.publish(
                Event::new(EventKind::TickFaulted)
                    .with_job(shared.job_name())
                    .with_tick(tick)
                    .with_reason(e.to_string()),
            );
            Ok(())
        }
    }
}

fn publish_completed(shared: &Shared, tick: u64) {
    shared.bus.publish(
        Event::new(EventKind::TickCompleted)
            .with_job(shared.job_name())
            .with_tick(tick),
    );
}

/// Sleeps for `delay` unless the token fires first.
///
/// Returns `false` when cancelled. `biased` makes cancellation win an
/// exact-tie race with the timer.
async fn sleep_cancellable(token: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = time::sleep(delay) => true,
    }
}
