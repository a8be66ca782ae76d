//! # pacer
//!
//! **Pacer** is a lightweight periodic execution library for Rust.
//!
//! It provides a primitive that repeatedly invokes a unit of work on a fixed
//! interval until explicitly stopped, guaranteeing that invocations never
//! overlap and that `start`/`stop` are race-free under arbitrary concurrent
//! use. A thin name-keyed [`Registry`] holds multiple executors and forwards
//! lifecycle calls to them.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   JobSpec    │   │   JobSpec    │   │   JobSpec    │
//!     │(user job #1) │   │(user job #2) │   │(user job #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry (name-keyed)                                            │
//! │  - Bus (broadcast events)                                         │
//! │  - forwards start/stop/deregister by name                         │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐       │
//! │  Periodic    │   │  Periodic    │   │  Periodic    │       │
//! │  Executor    │   │  Executor    │   │  Executor    │       │
//! │ (tick loop)  │   │ (tick loop)  │   │ (tick loop)  │       │
//! └┬─────────────┘   └┬─────────────┘   └┬─────────────┘       │
//!  │ Publishes        │ Publishes        │ Publishes           │
//!  │ Events:          │ Events:          │ Events:             │
//!  │ - Started        │ - TickStarting   │ - TickFaulted       │
//!  │ - TickScheduled  │ - TickCompleted  │ - Stopped           │
//!  ▼                  ▼                  ▼                     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                          fan-out listener ──► SubscriberSet
//!                                               (per-sub queues)
//! ```
//!
//! ### Executor lifecycle
//! ```text
//! new() ──► Idle ──start()──► Running
//!
//! loop {
//!   ├─► check cancellation token
//!   ├─► invoke job (runs to completion, never aborted)
//!   │     ├─ Ok            ─► TickCompleted
//!   │     ├─ Err(Canceled) ─► exit silently if stopping
//!   │     └─ Err(fault)    ─► TickFaulted, schedule continues
//!   ├─► delay = TickPolicy(interval, runtime)
//!   └─► cancellable sleep(delay)
//! }
//!
//! stop(): cancel token ─► join loop (drains in-flight tick) ─► Stopped
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                  |
//! |-------------------|------------------------------------------------------------------|-------------------------------------|
//! | **Jobs**          | Define jobs as async or blocking functions, easy to compose.     | [`Job`], [`JobFn`], [`BlockingJobFn`] |
//! | **Scheduling**    | Fixed-gap or drift-correcting tick computation.                  | [`Schedule`], [`TickPolicy`]        |
//! | **Lifecycle**     | Race-free, idempotent start/stop with a drain guarantee.         | [`PeriodicExecutor`]                |
//! | **Registry**      | Name-keyed collection with bulk start/stop.                      | [`Registry`], [`JobSpec`]           |
//! | **Subscriber API**| Hook into runtime events (logging, metrics, custom subscribers). | [`Subscribe`]                       |
//! | **Errors**        | Typed errors for jobs and the registry.                          | [`JobError`], [`RegistryError`]     |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use pacer::{Config, JobFn, JobRef, JobSpec, Registry, Schedule};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::builder(Config::default()).build();
//!
//!     let hits = Arc::new(AtomicU64::new(0));
//!     let h = Arc::clone(&hits);
//!     let poller: JobRef = JobFn::arc("poller", move |ctx: CancellationToken| {
//!         let h = Arc::clone(&h);
//!         async move {
//!             if ctx.is_cancelled() {
//!                 return Err(pacer::JobError::Canceled);
//!             }
//!             h.fetch_add(1, Ordering::SeqCst);
//!             Ok(())
//!         }
//!     });
//!
//!     let name = registry
//!         .register(JobSpec::new(poller, Schedule::new(Duration::from_millis(20))))
//!         .await?;
//!
//!     registry.start(&name).await?;
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     registry.stop(&name).await?;
//!
//!     assert!(hits.load(Ordering::SeqCst) >= 1);
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod jobs;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{PeriodicExecutor, Registry, RegistryBuilder};
pub use error::{JobError, RegistryError};
pub use events::{Bus, Event, EventKind};
pub use jobs::{BlockingJobFn, Job, JobFn, JobRef, JobSpec, Schedule};
pub use policies::TickPolicy;
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
