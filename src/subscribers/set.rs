//! # SubscriberSet: non-blocking fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers
//! **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and published as
//!   `SubscriberPanicked` (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for
//!   that subscriber and a `SubscriberOverflow` is published).
//!
//! Drops and panics observed while handling the plumbing's own
//! overflow/panic events are not re-reported; that keeps a subscriber that
//! misbehaves on every event from generating an unbounded event cascade.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::events::{Bus, Event};

use super::Subscribe;

/// Per-subscriber channel with metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
///
/// Workers exit when the set is dropped (their queues close).
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// `bus` receives the plumbing's own `SubscriberOverflow` /
    /// `SubscriberPanicked` events.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subscribers.len());

        for sub in subscribers {
            let capacity = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(capacity);
            let worker_bus = bus.clone();

            tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        if !ev.is_subscriber_plumbing() {
                            worker_bus.publish(Event::subscriber_panicked(
                                sub.name(),
                                format!("{panic_err:?}"),
                            ));
                        }
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
        }

        Self { channels, bus }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is
    /// dropped for it and a `SubscriberOverflow` is published.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !ev.is_subscriber_plumbing() {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }
}
