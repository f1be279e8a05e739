//! Thread-lifecycle showcase: typed return values, join ordering, and
//! relative completion timing.
//!
//! Each worker hands its summary back through its `JoinHandle`, the typed
//! replacement for the untyped pointer handoff of classic pthread demos.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

pub const WORKERS: usize = 6;
pub const MAX_OPERATIONS: usize = 8;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("showcase worker {thread_id} panicked")]
pub struct WorkerPanicked {
    pub thread_id: usize,
}

/// What one worker reports back when joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
    pub thread_id: usize,
    pub operations: usize,
    /// `thread_id * 100 + operations`, the classic demo token proving the
    /// value really came from that worker.
    pub token: usize,
    /// Wall time from run start to this worker finishing its last operation.
    pub finished_after: Duration,
}

/// Result of a full showcase run. Summaries appear in join order, which is
/// spawn order regardless of which worker finished first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseReport {
    pub total: i64,
    pub summaries: Vec<WorkerSummary>,
}

/// Workload for worker `thread_id`: varied but deterministic, so runs are
/// comparable.
fn operations_for(thread_id: usize) -> usize {
    (thread_id * 3) % MAX_OPERATIONS + 1
}

/// The grand total every complete run must reach.
pub fn expected_total() -> i64 {
    (1..=WORKERS)
        .map(|thread_id| {
            let base = (thread_id * 10) as i64;
            (1..=operations_for(thread_id)).map(|op| base * op as i64).sum::<i64>()
        })
        .sum()
}

/// Spawns the workers, waits for each in spawn order, and collects their
/// typed results. A panicked worker is fatal to the whole showcase.
pub fn run() -> Result<ShowcaseReport, WorkerPanicked> {
    let total = Mutex::new(0i64);
    let started = Instant::now();

    info!(workers = WORKERS, "spawning showcase workers");
    let summaries = thread::scope(|s| {
        let mut handles = Vec::with_capacity(WORKERS);
        for thread_id in 1..=WORKERS {
            let operations = operations_for(thread_id);
            let base_value = (thread_id * 10) as i64;
            let total = &total;
            let handle = s.spawn(move || {
                info!(thread_id, operations, "worker started");
                for op in 1..=operations {
                    thread::sleep(Duration::from_millis(2));
                    {
                        let mut slot = total.lock().unwrap_or_else(PoisonError::into_inner);
                        let local = base_value * op as i64;
                        *slot += local;
                        info!(thread_id, op, operations, local, shared = *slot, "operation applied");
                    }
                    thread::sleep(Duration::from_millis(1));
                }
                let finished_after = started.elapsed();
                info!(thread_id, ?finished_after, "worker completed");
                WorkerSummary {
                    thread_id,
                    operations,
                    token: thread_id * 100 + operations,
                    finished_after,
                }
            });
            handles.push((thread_id, handle));
        }

        let mut summaries = Vec::with_capacity(WORKERS);
        for (thread_id, handle) in handles {
            let summary = handle.join().map_err(|_| WorkerPanicked { thread_id })?;
            info!(
                thread_id = summary.thread_id,
                token = summary.token,
                "worker joined"
            );
            summaries.push(summary);
        }
        Ok(summaries)
    })?;

    let total = total.into_inner().unwrap_or_else(PoisonError::into_inner);
    info!(total, "showcase complete");
    Ok(ShowcaseReport { total, summaries })
}
