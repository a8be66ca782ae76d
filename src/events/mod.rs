//! # Runtime events for the pacer runtime.
//!
//! Executors and the registry report everything they do through a broadcast
//! [`Bus`]; nothing in the crate logs ambiently. Faults raised by jobs are
//! delivered here as [`EventKind::TickFaulted`] and never propagate further.
//!
//! ```text
//! Publishers (many):                  Listener (one, per registry):
//!   Executor A ──┐
//!   Executor B ──┼──────► Bus ───────► fan-out ────► SubscriberSet
//!   Registry   ──┘  (broadcast chan)
//! ```

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
