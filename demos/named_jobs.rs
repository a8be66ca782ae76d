//! # Example: named_jobs
//!
//! Demonstrates the name-keyed [`Registry`] with the built-in [`LogWriter`]
//! subscriber.
//!
//! Shows how to:
//! - Register async and blocking jobs under explicit names
//! - Start everything with [`Registry::start_all`]
//! - Stop one job by name, then drain the rest with
//!   [`Registry::stop_all`]
//!
//! ## Run
//! ```bash
//! cargo run --example named_jobs --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use pacer::{
    BlockingJobFn, Config, JobFn, JobRef, JobSpec, LogWriter, Registry, Schedule, Subscribe,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== named_jobs example ===\n");

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let registry = Registry::builder(Config::default())
        .with_subscribers(subs)
        .build();

    let heartbeat: JobRef = JobFn::arc("heartbeat", |_ctx: CancellationToken| async move {
        println!("[heartbeat] beat");
        Ok(())
    });
    registry
        .register(
            JobSpec::new(heartbeat, Schedule::new(Duration::from_millis(300))).with_name("heartbeat"),
        )
        .await?;

    // A synchronous body runs on the blocking pool and still honors the token.
    let compactor: JobRef = BlockingJobFn::arc("compactor", |ctx: CancellationToken| {
        for _ in 0..5 {
            if ctx.is_cancelled() {
                return Err(pacer::JobError::Canceled);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        println!("[compactor] pass complete");
        Ok(())
    });
    registry
        .register(
            JobSpec::new(compactor, Schedule::new(Duration::from_millis(500))).with_name("compactor"),
        )
        .await?;

    println!("[main] jobs: {:?}", registry.list().await);
    registry.start_all().await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    println!("\n[main] stopping 'heartbeat' only");
    registry.stop("heartbeat").await?;
    tokio::time::sleep(Duration::from_secs(1)).await;

    println!("\n[main] stopping everything (waits for in-flight work)");
    registry.stop_all().await;
    println!("[main] done");

    Ok(())
}
