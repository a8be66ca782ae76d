//! # Runtime events emitted by executors and the registry.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Executor lifecycle**: started, stopped
//! - **Tick flow**: a single invocation starting, completing, faulting, or
//!   the next one being scheduled
//! - **Registry management**: jobs registered/deregistered
//!
//! The [`Event`] struct carries additional metadata such as timestamps, job
//! name, tick number, reasons, and scheduling delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use pacer::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TickFaulted)
//!     .with_job("poller")
//!     .with_reason("boom")
//!     .with_tick(3);
//!
//! assert_eq!(ev.kind, EventKind::TickFaulted);
//! assert_eq!(ev.job.as_deref(), Some("poller"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Executor lifecycle ===
    /// Executor transitioned to running; a schedule is now armed.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Started,

    /// Executor stopped: the schedule is disarmed and any in-flight
    /// invocation has fully finished.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Stopped,

    // === Tick flow ===
    /// A tick is starting an invocation of the job.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `tick`: tick number (1-based, per running lifetime)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickStarting,

    /// The invocation finished successfully (or unwound gracefully on
    /// cancellation outside of a stop).
    ///
    /// Sets:
    /// - `job`: job name
    /// - `tick`: tick number
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickCompleted,

    /// The invocation returned a non-cancellation error. The fault is
    /// recovered here; the schedule continues.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `tick`: tick number
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickFaulted,

    /// The next tick has been scheduled.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `tick`: number of the tick that just finished
    /// - `delay_ms`: delay before the next invocation (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickScheduled,

    // === Registry management ===
    /// A job was added to the registry.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    JobRegistered,

    /// A job was stopped and removed from the registry.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    JobDeregistered,

    // === Subscriber plumbing ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `job`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `job`: subscriber name
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the job (or subscriber), if applicable.
    pub job: Option<Arc<str>>,
    /// Tick count within the current running lifetime (starting from 1).
    pub tick: Option<u64>,
    /// Delay before the next invocation in milliseconds (compact).
    pub delay_ms: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            job: None,
            tick: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a job (or subscriber) name.
    #[inline]
    pub fn with_job(mut self, job: impl Into<Arc<str>>) -> Self {
        self.job = Some(job.into());
        self
    }

    /// Attaches a tick number.
    #[inline]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attaches a scheduling delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_job(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_job(subscriber)
            .with_reason(info)
    }

    /// True for events produced by the subscriber plumbing itself.
    ///
    /// The fan-out uses this to avoid re-reporting drops of its own
    /// overflow/panic events.
    #[inline]
    pub fn is_subscriber_plumbing(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::Started);
        let b = Event::new(EventKind::Started);
        assert!(b.seq > a.seq, "seq must increase: {} vs {}", a.seq, b.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::TickScheduled)
            .with_job("worker")
            .with_tick(7)
            .with_delay(Duration::from_millis(1500))
            .with_reason("why not");

        assert_eq!(ev.job.as_deref(), Some("worker"));
        assert_eq!(ev.tick, Some(7));
        assert_eq!(ev.delay_ms, Some(1500));
        assert_eq!(ev.reason.as_deref(), Some("why not"));
    }

    #[test]
    fn test_plumbing_guard() {
        assert!(Event::subscriber_overflow("s", "full").is_subscriber_plumbing());
        assert!(Event::subscriber_panicked("s", "boom".into()).is_subscriber_plumbing());
        assert!(!Event::new(EventKind::TickFaulted).is_subscriber_plumbing());
    }
}
