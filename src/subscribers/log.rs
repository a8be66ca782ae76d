//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [started] job=poller
//! [tick-start] job=poller tick=1
//! [tick-done] job=poller tick=1
//! [tick-fault] job=poller tick=2 err="connection refused"
//! [tick-scheduled] job=poller tick=2 delay_ms=1000
//! [stopped] job=poller
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Started => {
                println!("[started] job={:?}", e.job);
            }
            EventKind::Stopped => {
                println!("[stopped] job={:?}", e.job);
            }
            EventKind::TickStarting => {
                if let (Some(job), Some(tick)) = (&e.job, e.tick) {
                    println!("[tick-start] job={job} tick={tick}");
                }
            }
            EventKind::TickCompleted => {
                if let (Some(job), Some(tick)) = (&e.job, e.tick) {
                    println!("[tick-done] job={job} tick={tick}");
                }
            }
            EventKind::TickFaulted => {
                println!(
                    "[tick-fault] job={:?} tick={:?} err={:?}",
                    e.job, e.tick, e.reason
                );
            }
            EventKind::TickScheduled => {
                println!(
                    "[tick-scheduled] job={:?} tick={:?} delay_ms={:?}",
                    e.job, e.tick, e.delay_ms
                );
            }
            EventKind::JobRegistered => {
                println!("[registered] job={:?}", e.job);
            }
            EventKind::JobDeregistered => {
                println!("[deregistered] job={:?}", e.job);
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.job, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panic] subscriber={:?} info={:?}",
                    e.job, e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
