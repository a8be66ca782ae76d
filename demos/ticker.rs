//! # Example: ticker
//!
//! Demonstrates a standalone [`PeriodicExecutor`] driving one job.
//!
//! Shows how to:
//! - Build a job with [`JobFn`]
//! - Start it on a 250ms interval
//! - Mutate the interval while the schedule is running
//! - Stop and observe the drain guarantee
//!
//! ## Run
//! ```bash
//! cargo run --example ticker
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pacer::{Bus, JobFn, JobRef, PeriodicExecutor, Schedule};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== ticker example ===\n");

    let hits = Arc::new(AtomicU64::new(0));
    let h = Arc::clone(&hits);
    let ticker: JobRef = JobFn::arc("ticker", move |ctx: CancellationToken| {
        let h = Arc::clone(&h);
        async move {
            if ctx.is_cancelled() {
                return Err(pacer::JobError::Canceled);
            }
            let n = h.fetch_add(1, Ordering::SeqCst) + 1;
            println!("[ticker] tick #{n}");
            Ok(())
        }
    });

    let exec = PeriodicExecutor::new(ticker, Schedule::new(Duration::from_millis(250)), Bus::new(64));

    println!("[main] starting with a 250ms interval");
    exec.start().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    println!("[main] switching to a 500ms interval (applies to the next gap)");
    exec.set_interval(Duration::from_millis(500));
    tokio::time::sleep(Duration::from_secs(2)).await;

    println!("[main] stopping; any in-flight tick drains first");
    exec.stop().await;
    println!("[main] stopped after {} ticks", hits.load(Ordering::SeqCst));

    Ok(())
}
