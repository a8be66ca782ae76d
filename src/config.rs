//! # Runtime configuration.
//!
//! Provides [`Config`], the settings consumed by
//! [`RegistryBuilder`](crate::RegistryBuilder) when wiring the event bus and
//! subscriber fan-out.
//!
//! Per-job scheduling parameters live in [`Schedule`](crate::Schedule), not
//! here; `Config` only covers the shared runtime plumbing.

/// Configuration for the registry runtime.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages
    /// will observe `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` uses this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration: `bus_capacity = 1024`.
    fn default() -> Self {
        Self { bus_capacity: 1024 }
    }
}
