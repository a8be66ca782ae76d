//! # Named registry of periodic executors.
//!
//! Maps a caller-chosen (or generated) name to one
//! [`PeriodicExecutor`] and forwards lifecycle calls by name. The registry
//! adds no scheduling logic of its own; it owns the shared event [`Bus`]
//! and the name bookkeeping.
//!
//! ## Rules
//! - Registration fails on a duplicate name; unnamed registrations get a
//!   generated `job-N` name.
//! - `start`/`stop`/`deregister` on an unknown name return
//!   [`RegistryError::NotFound`] rather than silently doing nothing.
//! - `stop_all` waits for every executor's `stop` to complete before
//!   returning (wait-for-all, not best-effort).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::core::executor::PeriodicExecutor;
use crate::error::RegistryError;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::JobSpec;

/// Name-keyed collection of executors sharing one event bus.
///
/// Built via [`Registry::builder`]; see
/// [`RegistryBuilder`](crate::RegistryBuilder) for subscriber wiring.
pub struct Registry {
    jobs: RwLock<HashMap<String, Arc<PeriodicExecutor>>>,
    bus: Bus,
    name_seq: AtomicU64,
    /// Cancelled on drop so the subscriber fan-out task exits with us.
    shutdown: CancellationToken,
}

impl Registry {
    /// Starts building a registry with the given configuration.
    pub fn builder(config: crate::config::Config) -> crate::core::builder::RegistryBuilder {
        crate::core::builder::RegistryBuilder::new(config)
    }

    pub(crate) fn new(bus: Bus, shutdown: CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            jobs: RwLock::new(HashMap::new()),
            bus,
            name_seq: AtomicU64::new(0),
            shutdown,
        })
    }

    /// Returns the shared event bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Adds a job under its spec name, or a generated `job-N` name.
    ///
    /// The executor is created idle; call [`start`](Self::start) (or
    /// [`start_all`](Self::start_all)) to arm its schedule. Returns the
    /// name the job was registered under.
    pub async fn register(&self, spec: JobSpec) -> Result<String, RegistryError> {
        let (name, job, schedule) = spec.into_parts();
        let mut jobs = self.jobs.write().await;

        let name = match name {
            Some(name) => {
                if jobs.contains_key(&name) {
                    return Err(RegistryError::NameTaken { name });
                }
                name
            }
            None => loop {
                let candidate = format!("job-{}", self.name_seq.fetch_add(1, Ordering::Relaxed));
                if !jobs.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let exec = Arc::new(PeriodicExecutor::new(job, schedule, self.bus.clone()));
        jobs.insert(name.clone(), exec);
        drop(jobs);

        self.bus
            .publish(Event::new(EventKind::JobRegistered).with_job(name.clone()));
        Ok(name)
    }

    /// Arms the named job's schedule. A no-op if it is already running.
    pub async fn start(&self, name: &str) -> Result<(), RegistryError> {
        self.get(name).await?.start().await;
        Ok(())
    }

    /// Stops the named job, waiting for its in-flight invocation to finish.
    /// A no-op if it is already stopped.
    pub async fn stop(&self, name: &str) -> Result<(), RegistryError> {
        self.get(name).await?.stop().await;
        Ok(())
    }

    /// True if the named job's schedule is currently armed.
    pub async fn is_running(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.get(name).await?.is_running())
    }

    /// Replaces the named job's interval; applies to its next gap.
    pub async fn set_interval(&self, name: &str, interval: Duration) -> Result<(), RegistryError> {
        self.get(name).await?.set_interval(interval);
        Ok(())
    }

    /// Stops the named job and removes it from the registry.
    pub async fn deregister(&self, name: &str) -> Result<(), RegistryError> {
        let exec = {
            let mut jobs = self.jobs.write().await;
            jobs.remove(name)
        }
        .ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })?;

        exec.stop().await;
        self.bus
            .publish(Event::new(EventKind::JobDeregistered).with_job(name));
        Ok(())
    }

    /// Arms every registered job's schedule.
    pub async fn start_all(&self) {
        for exec in self.snapshot().await {
            exec.start().await;
        }
    }

    /// Stops every registered job, returning once all of them have fully
    /// drained.
    pub async fn stop_all(&self) {
        let execs = self.snapshot().await;
        futures::future::join_all(execs.iter().map(|e| e.stop())).await;
    }

    /// Returns the sorted list of registered job names.
    pub async fn list(&self) -> Vec<String> {
        let jobs = self.jobs.read().await;
        let mut names: Vec<String> = jobs.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// True if no jobs are registered.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    async fn get(&self, name: &str) -> Result<Arc<PeriodicExecutor>, RegistryError> {
        let jobs = self.jobs.read().await;
        jobs.get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    async fn snapshot(&self) -> Vec<Arc<PeriodicExecutor>> {
        self.jobs.read().await.values().cloned().collect()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
