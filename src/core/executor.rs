//! # PeriodicExecutor: the periodic scheduling state machine for one job.
//!
//! Owns the `Idle`/`Running` lifecycle, the run-lifetime cancellation
//! token, and the handle of the spawned run loop. `start`, `stop`, and the
//! loop itself may race from any number of tasks or threads; every
//! transition happens under one lifecycle lock, which is the single
//! serialization point.
//!
//! ## Lifecycle
//! ```text
//! new() ──► Idle ──start()──► Running { token, loop_task }
//!             ▲                  │
//!             │                  │ stop():
//!             │                  │   ├─► cancel token
//!             │                  │   ├─► join loop_task   (drains the
//!             │                  │   │    in-flight invocation)
//!             └──────────────────┘   └─► publish Stopped
//!
//! drop ──► cancel token, detach loop (release-only, no waiting)
//! ```
//!
//! ## Rules
//! - `start` while running is a no-op; the schedule is **not** reset.
//! - `stop` while idle is a no-op that returns immediately.
//! - `stop` holds the lifecycle lock for the whole drain, so a concurrent
//!   `start` begins a fresh schedule (with a fresh token) only after the
//!   stop has fully completed. Tokens are never reused across runs.
//! - Dropping the executor cancels the schedule without waiting for an
//!   in-flight invocation; call `stop` first when the drain guarantee is
//!   needed.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::ticker::{self, Shared};
use crate::events::{Bus, Event, EventKind};
use crate::jobs::{JobRef, Schedule};

/// Lifecycle of one executor, transitioned only under the lifecycle lock.
enum Lifecycle {
    Idle,
    Running {
        /// Run-lifetime cancellation signal, fresh per `Idle → Running`.
        token: CancellationToken,
        /// The spawned run loop; `stop` joins it to drain in-flight work.
        loop_task: JoinHandle<()>,
    },
}

/// Repeatedly invokes one job on a fixed interval until stopped.
///
/// ### Guarantees
/// - Invocations never overlap: tick *N+1* starts only after tick *N* has
///   returned.
/// - `stop` returns only after any in-flight invocation has fully finished.
/// - `start`/`stop` are idempotent and race-free under arbitrary
///   interleaving.
/// - A job fault never terminates the schedule; it is published to the bus
///   and the next tick is armed as usual.
///
/// Cancellation is cooperative: the job receives the run-lifetime
/// [`CancellationToken`] and is expected, but not required, to honor it
/// promptly. A job that never returns blocks `stop` indefinitely.
pub struct PeriodicExecutor {
    shared: Arc<Shared>,
    start_delay_nanos: AtomicU64,
    lifecycle: Mutex<Lifecycle>,
    running: AtomicBool,
}

impl PeriodicExecutor {
    /// Creates an executor for `job`; no background activity starts until
    /// [`start`](Self::start).
    pub fn new(job: JobRef, schedule: Schedule, bus: Bus) -> Self {
        Self {
            shared: Arc::new(Shared::new(job, &schedule, bus)),
            start_delay_nanos: AtomicU64::new(ticker::to_nanos(schedule.start_delay)),
            lifecycle: Mutex::new(Lifecycle::Idle),
            running: AtomicBool::new(false),
        }
    }

    /// Arms the schedule: the first invocation fires after the start delay.
    ///
    /// Fire-and-forget: returns without waiting for any invocation. A
    /// no-op when already running.
    pub async fn start(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if matches!(&*lifecycle, Lifecycle::Running { .. }) {
            return;
        }

        let token = CancellationToken::new();
        let loop_task = tokio::spawn(ticker::run_loop(
            Arc::clone(&self.shared),
            token.clone(),
            self.start_delay(),
        ));
        *lifecycle = Lifecycle::Running { token, loop_task };
        self.running.store(true, Ordering::Release);
        self.shared.bus().publish(
            Event::new(EventKind::Started).with_job(self.shared.job_name()),
        );
    }

    /// Disarms the schedule and waits for any in-flight invocation.
    ///
    /// Cancels the run-lifetime token (so a cooperative job unwinds
    /// promptly), then joins the run loop. Returns only once nothing is
    /// running anymore. A no-op when already stopped.
    pub async fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        let Lifecycle::Running { token, loop_task } =
            std::mem::replace(&mut *lifecycle, Lifecycle::Idle)
        else {
            return;
        };

        token.cancel();
        if let Err(join_err) = loop_task.await {
            self.shared.bus().publish(
                Event::new(EventKind::TickFaulted)
                    .with_job(self.shared.job_name())
                    .with_reason(format!("run loop panicked: {join_err}")),
            );
        }
        self.running.store(false, Ordering::Release);
        self.shared.bus().publish(
            Event::new(EventKind::Stopped).with_job(self.shared.job_name()),
        );
        // The lock is held until here: a concurrent start waits out the drain.
    }

    /// True between a completed `start` and the end of the matching `stop`.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns the job's name.
    pub fn job_name(&self) -> &str {
        self.shared.job_name()
    }

    /// Returns the current interval.
    pub fn interval(&self) -> Duration {
        self.shared.interval()
    }

    /// Replaces the interval.
    ///
    /// Takes effect on the next scheduling decision: an already armed wait
    /// is never pre-empted, and the gap after the currently running (or
    /// next) invocation uses the new value.
    pub fn set_interval(&self, interval: Duration) {
        self.shared.set_interval(interval);
    }

    /// Returns the delay before the first invocation after `start`.
    pub fn start_delay(&self) -> Duration {
        Duration::from_nanos(self.start_delay_nanos.load(Ordering::Relaxed))
    }

    /// Replaces the start delay.
    ///
    /// Read once per `start`; mutating it while running has no retroactive
    /// effect on the current schedule.
    pub fn set_start_delay(&self, start_delay: Duration) {
        self.start_delay_nanos
            .store(ticker::to_nanos(start_delay), Ordering::Relaxed);
    }

    /// Returns the event bus this executor publishes to.
    pub fn bus(&self) -> &Bus {
        self.shared.bus()
    }
}

impl Drop for PeriodicExecutor {
    /// Release-only disposal: cancels the run-lifetime token and detaches
    /// the loop task without waiting for an in-flight invocation.
    fn drop(&mut self) {
        if let Lifecycle::Running { token, .. } = self.lifecycle.get_mut() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64 as Counter;
    use tokio::time::{self, Instant};

    use crate::error::JobError;
    use crate::jobs::JobFn;
    use crate::policies::TickPolicy;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn counting_job(hits: Arc<Counter>) -> JobRef {
        JobFn::arc("count", move |_ctx: CancellationToken| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    fn slow_job(hits: Arc<Counter>, runtime: Duration) -> JobRef {
        JobFn::arc("slow", move |_ctx: CancellationToken| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                // Deliberately ignores the token.
                time::sleep(runtime).await;
                Ok(())
            }
        })
    }

    fn executor(job: JobRef, schedule: Schedule) -> (PeriodicExecutor, Bus) {
        let bus = Bus::new(256);
        (PeriodicExecutor::new(job, schedule, bus.clone()), bus)
    }

    fn drain_kinds(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        kinds
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_interval_until_stopped() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(counting_job(Arc::clone(&hits)), Schedule::new(ms(100)));

        exec.start().await;
        time::sleep(ms(350)).await;
        exec.stop().await;

        // Fires at t = 0, 100, 200, 300.
        assert_eq!(hits.load(Ordering::SeqCst), 4);

        // The wake-up armed for t = 400 must never fire.
        time::sleep(ms(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 4);
        assert!(!exec.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_delay_defers_first_tick() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(
            counting_job(Arc::clone(&hits)),
            Schedule::new(ms(100)).with_start_delay(ms(200)),
        );

        exec.start().await;
        time::sleep(ms(150)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        time::sleep(ms(100)).await; // t = 250
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        time::sleep(ms(100)).await; // t = 350
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        exec.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(counting_job(Arc::clone(&hits)), Schedule::new(ms(100)));

        exec.start().await;
        time::sleep(ms(30)).await;
        exec.start().await; // must not reset or double the schedule

        time::sleep(ms(200)).await; // t = 230; ticks at 0, 100, 200
        exec.stop().await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_restart_gets_fresh_schedule() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(counting_job(Arc::clone(&hits)), Schedule::new(ms(100)));

        exec.start().await;
        time::sleep(ms(10)).await;
        exec.stop().await;
        exec.stop().await; // second stop: immediate no-op
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        exec.start().await;
        time::sleep(ms(10)).await; // fresh run fires immediately again
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        exec.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_waits_for_inflight_invocation() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(slow_job(Arc::clone(&hits), ms(50)), Schedule::new(ms(100)));

        exec.start().await;
        time::sleep(ms(10)).await; // invocation in flight, finishes at t = 50

        let before = Instant::now();
        exec.stop().await;
        let waited = before.elapsed();

        assert!(
            waited >= ms(40),
            "stop must wait out the invocation, waited {waited:?}"
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invocations_never_overlap() {
        let active = Arc::new(Counter::new(0));
        let peak = Arc::new(Counter::new(0));
        let hits = Arc::new(Counter::new(0));

        let (a, p, h) = (Arc::clone(&active), Arc::clone(&peak), Arc::clone(&hits));
        let job = JobFn::arc("overlapping?", move |_ctx: CancellationToken| {
            let (a, p, h) = (Arc::clone(&a), Arc::clone(&p), Arc::clone(&h));
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                p.fetch_max(now, Ordering::SeqCst);
                time::sleep(ms(50)).await;
                a.fetch_sub(1, Ordering::SeqCst);
                h.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        // Interval far shorter than the runtime: ticks start every 60ms,
        // not every 10ms.
        let (exec, _bus) = executor(job, Schedule::new(ms(10)));
        exec.start().await;
        time::sleep(ms(500)).await;
        exec.stop().await;

        assert_eq!(peak.load(Ordering::SeqCst), 1, "invocations overlapped");
        // Starts at t = 0, 60, ..., 480; the last one drains during stop.
        assert_eq!(hits.load(Ordering::SeqCst), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_faulting_job_keeps_schedule() {
        let hits = Arc::new(Counter::new(0));
        let h = Arc::clone(&hits);
        let job = JobFn::arc("flaky", move |_ctx: CancellationToken| {
            let h = Arc::clone(&h);
            async move {
                h.fetch_add(1, Ordering::SeqCst);
                Err(JobError::fail("boom"))
            }
        });

        let (exec, bus) = executor(job, Schedule::new(ms(100)));
        let mut rx = bus.subscribe();

        exec.start().await;
        time::sleep(ms(250)).await;
        exec.stop().await;

        assert_eq!(hits.load(Ordering::SeqCst), 3, "faults must not stop the schedule");
        let faults = drain_kinds(&mut rx)
            .into_iter()
            .filter(|k| *k == EventKind::TickFaulted)
            .count();
        assert_eq!(faults, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_applies_to_next_gap_only() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(counting_job(Arc::clone(&hits)), Schedule::new(ms(100)));

        exec.start().await;
        time::sleep(ms(150)).await; // ticks at 0, 100
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        // The wait armed at t = 100 still fires at t = 200; only the gap
        // after that uses the new interval.
        exec.set_interval(ms(300));

        time::sleep(ms(60)).await; // t = 210
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        time::sleep(ms(280)).await; // t = 490, next tick due at 500
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        time::sleep(ms(20)).await; // t = 510
        assert_eq!(hits.load(Ordering::SeqCst), 4);

        exec.stop().await;
        assert_eq!(exec.interval(), ms(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_rate_compensates_for_runtime() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(
            slow_job(Arc::clone(&hits), ms(30)),
            Schedule::new(ms(100)).with_tick_policy(TickPolicy::FixedRate),
        );

        exec.start().await;
        // Starts land on the 100ms grid: t = 0, 100, 200, 300.
        time::sleep(ms(350)).await;
        exec.stop().await;
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooperative_cancellation_during_stop_is_silent() {
        let job = JobFn::arc("cooperative", |ctx: CancellationToken| async move {
            tokio::select! {
                _ = ctx.cancelled() => Err(JobError::Canceled),
                _ = time::sleep(ms(100)) => Ok(()),
            }
        });

        let (exec, bus) = executor(job, Schedule::new(ms(50)));
        let mut rx = bus.subscribe();

        exec.start().await;
        time::sleep(ms(30)).await; // invocation in flight until t = 100
        let before = Instant::now();
        exec.stop().await;

        // The job unwound on the token instead of running out its sleep.
        assert!(before.elapsed() < ms(50));

        let kinds = drain_kinds(&mut rx);
        assert!(
            !kinds.contains(&EventKind::TickFaulted),
            "self-cancellation must not be reported as a fault: {kinds:?}"
        );
        assert!(kinds.contains(&EventKind::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_schedule_without_waiting() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(counting_job(Arc::clone(&hits)), Schedule::new(ms(100)));

        exec.start().await;
        time::sleep(ms(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        drop(exec);
        time::sleep(ms(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_starts_produce_one_schedule() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(counting_job(Arc::clone(&hits)), Schedule::new(ms(100)));
        let exec = Arc::new(exec);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let exec = Arc::clone(&exec);
            handles.push(tokio::spawn(async move { exec.start().await }));
        }
        for h in handles {
            h.await.unwrap();
        }

        time::sleep(ms(250)).await; // ticks at 0, 100, 200
        exec.stop().await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_delay_mutation_applies_to_next_run() {
        let hits = Arc::new(Counter::new(0));
        let (exec, _bus) = executor(
            counting_job(Arc::clone(&hits)),
            Schedule::new(ms(100)).with_start_delay(ms(50)),
        );

        exec.set_start_delay(ms(200));
        exec.start().await;
        time::sleep(ms(150)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0, "mutation before start must apply");
        time::sleep(ms(100)).await; // t = 250
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Mutation while running has no retroactive effect.
        exec.set_start_delay(ms(0));
        time::sleep(ms(100)).await; // t = 350, next tick still at 300
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        exec.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_does_not_reuse_old_token() {
        // A job that latches the token it saw; after stop + restart the
        // latched token from run one must not be the cancelled one in use.
        let seen: Arc<tokio::sync::Mutex<Vec<CancellationToken>>> =
            Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let job = JobFn::arc("latch", move |ctx: CancellationToken| {
            let s = Arc::clone(&s);
            async move {
                s.lock().await.push(ctx);
                Ok(())
            }
        });

        let (exec, _bus) = executor(job, Schedule::new(ms(100)));
        exec.start().await;
        time::sleep(ms(10)).await;
        exec.stop().await;

        exec.start().await;
        time::sleep(ms(10)).await;
        {
            let tokens = seen.lock().await;
            assert_eq!(tokens.len(), 2);
            assert!(tokens[0].is_cancelled(), "first run's signal was triggered by stop");
            assert!(
                !tokens[1].is_cancelled(),
                "restart must allocate a fresh signal, not reuse the cancelled one"
            );
        }
        exec.stop().await;
    }
}
