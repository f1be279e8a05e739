//! Run lifecycle: prime the register, start the writers, verify, stop, join.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use thiserror::Error;
use tracing::info;

use crate::directory::{Directory, Record};
use crate::guard::Guard;
use crate::register::SharedRegister;
use crate::verifier::{self, VerifyReport, Violation, DEFAULT_ITERATIONS};

/// Configuration for one writer/verifier run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Wrap every composite copy in the mutual-exclusion guard. Turning
    /// this off is the race-demonstrating configuration.
    pub guarded: bool,
    /// Verifier iteration budget.
    pub iterations: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            guarded: true,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// How a run can end short of a clean report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    #[error(transparent)]
    Violation(#[from] Violation),
    /// A writer died mid-run; without its liveness the run proves nothing.
    #[error("writer {identity} panicked")]
    WriterPanicked { identity: usize },
}

fn writer_loop(entry: &Record, register: &SharedRegister, guard: Option<&Guard>, stop: &AtomicBool) {
    // Relaxed is enough: a stale read only costs one extra copy.
    while !stop.load(Ordering::Relaxed) {
        register.store(entry, guard);
    }
    info!(identity = entry.identity_number, "writer stopped");
}

/// Runs the full cycle over `directory`: one writer per entry hammering the
/// shared register while the verifier snapshots it.
///
/// Sequencing: the guard and register are created before any writer starts;
/// the stop signal is raised once the verifier finishes (clean or not); the
/// guard is released only after every writer has been joined. On a detected
/// violation the writers are still stopped and joined so that callers get a
/// structured [`Violation`] back instead of a process exit.
pub fn run(directory: &Directory, options: &RunOptions) -> Result<VerifyReport, RunError> {
    let guard = options.guarded.then(Guard::new);
    let register = SharedRegister::new();
    let stop = AtomicBool::new(false);

    info!(
        guarded = options.guarded,
        writers = directory.len(),
        iterations = options.iterations,
        "starting register verification run"
    );

    // Prime through the primitive so the verifier never sees a blank record.
    register.store(&directory.entries()[0], guard.as_ref());

    let outcome = thread::scope(|s| {
        let mut writers = Vec::with_capacity(directory.len());
        for entry in directory.entries() {
            let register = &register;
            let guard = guard.as_ref();
            let stop = &stop;
            let handle = s.spawn(move || writer_loop(entry, register, guard, stop));
            writers.push((entry.identity_number, handle));
        }

        let verdict = verifier::verify(&register, directory, guard.as_ref(), options.iterations);

        stop.store(true, Ordering::Relaxed);
        for (identity, handle) in writers {
            if handle.join().is_err() {
                return Err(RunError::WriterPanicked { identity });
            }
        }
        verdict.map_err(RunError::from)
    });

    // All writers are joined by now; dropping `guard` after this point is
    // the teardown ordering the lifecycle requires.
    info!("all writers joined, guard released");
    outcome
}
