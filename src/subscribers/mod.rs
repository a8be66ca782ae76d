//! # Event subscribers for the pacer runtime.
//!
//! Provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out used
//! by [`RegistryBuilder`](crate::RegistryBuilder).
//!
//! ```text
//! Event flow:
//!   Executor ── publish(Event) ──► Bus ──► fan-out listener ──► SubscriberSet
//!                                              ┌─────────┬─────────┐
//!                                              ▼         ▼         ▼
//!                                         [queue S1] [queue S2] [queue SN]
//!                                              │         │         │
//!                                        worker S1  worker S2  worker SN
//!                                              ▼         ▼         ▼
//!                                        s1.on_event s2.on_event sN.on_event
//! ```

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
