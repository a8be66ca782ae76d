//! # RegistryBuilder: wires the bus and subscriber fan-out.
//!
//! Construction-time plumbing for [`Registry`]: creates the event [`Bus`]
//! from [`Config`], attaches subscribers behind a [`SubscriberSet`], and
//! spawns the single listener that fans bus events out to them.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::registry::Registry;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`Registry`] with optional subscribers.
pub struct RegistryBuilder {
    config: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            subscribers: Vec::new(),
        }
    }

    /// Adds one event subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Replaces the subscriber list.
    ///
    /// Subscribers receive runtime events (executor lifecycle, tick flow,
    /// registry changes) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the registry, spawning the subscriber fan-out listener when
    /// any subscribers were attached.
    ///
    /// The listener exits when the registry is dropped.
    pub fn build(self) -> Arc<Registry> {
        let bus = Bus::new(self.config.bus_capacity_clamped());
        let shutdown = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let set = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
            spawn_fanout(&bus, set, shutdown.clone());
        }

        Registry::new(bus, shutdown)
    }
}

/// Subscribes to the bus and forwards each event to the subscriber set.
fn spawn_fanout(bus: &Bus, set: Arc<SubscriberSet>, shutdown: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time;

    use crate::events::{Event, EventKind};
    use crate::jobs::{JobFn, JobRef, JobSpec, Schedule};

    struct Collecting {
        kinds: std::sync::Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Collecting {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "collecting"
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_observe_the_full_lifecycle() {
        let collector = Arc::new(Collecting {
            kinds: std::sync::Mutex::new(Vec::new()),
        });
        let registry = Registry::builder(Config::default())
            .with_subscriber(Arc::clone(&collector) as Arc<dyn Subscribe>)
            .build();

        let hits = Arc::new(AtomicU64::new(0));
        let h = Arc::clone(&hits);
        let job: JobRef = JobFn::arc("observed", move |_ctx: CancellationToken| {
            let h = Arc::clone(&h);
            async move {
                h.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        registry
            .register(JobSpec::new(job, Schedule::new(ms(100))).with_name("observed"))
            .await
            .unwrap();
        registry.start("observed").await.unwrap();
        time::sleep(ms(150)).await;
        registry.stop("observed").await.unwrap();

        // Let the fan-out workers drain their queues.
        time::sleep(ms(10)).await;

        let kinds = collector.kinds.lock().unwrap().clone();
        for expected in [
            EventKind::JobRegistered,
            EventKind::Started,
            EventKind::TickStarting,
            EventKind::TickCompleted,
            EventKind::TickScheduled,
            EventKind::Stopped,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?} in {kinds:?}");
        }
    }
}
