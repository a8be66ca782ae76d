//! # Scheduling policies.
//!
//! Provides [`TickPolicy`], the strategy deciding how the gap between two
//! invocations is measured. Selected once at construction via
//! [`Schedule`](crate::Schedule).

mod tick;

pub use tick::TickPolicy;
