//! # Tick policy: how the next wake-up is computed.
//!
//! [`TickPolicy`] decides what "run every `interval`" means relative to the
//! runtime of the invocation that just finished:
//!
//! - [`TickPolicy::FromCompletion`] (default) — the gap is measured from the
//!   *end* of the previous invocation. Successive starts drift by the
//!   invocation's own runtime; the gap between end and next start is always
//!   the full interval.
//! - [`TickPolicy::FixedRate`] — drift-correcting: the invocation's runtime
//!   is subtracted from the gap, so starts track an `interval`-spaced grid.
//!   An invocation that overruns the interval schedules the next tick
//!   immediately (delay clamps to zero); invocations still never overlap.
//!
//! ```text
//! FromCompletion, interval = 100ms, runtime = 30ms:
//!   |run 30|---- 100 ----|run 30|---- 100 ----|       starts 130ms apart
//!
//! FixedRate, interval = 100ms, runtime = 30ms:
//!   |run 30|---- 70 -----|run 30|---- 70 -----|       starts 100ms apart
//! ```

use std::time::Duration;

/// Policy controlling how the delay before the next invocation is derived
/// from the configured interval and the elapsed runtime of the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickPolicy {
    /// Wait the full interval measured from invocation completion (default).
    #[default]
    FromCompletion,
    /// Subtract the invocation's runtime from the interval, clamping at zero.
    FixedRate,
}

impl TickPolicy {
    /// Computes the delay before the next invocation.
    ///
    /// `elapsed` is the runtime of the invocation that just finished.
    pub fn next_delay(&self, interval: Duration, elapsed: Duration) -> Duration {
        match self {
            TickPolicy::FromCompletion => interval,
            TickPolicy::FixedRate => interval.saturating_sub(elapsed),
        }
    }
}
