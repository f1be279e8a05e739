//! End-to-end runs of the writer/verifier cycle.
//!
//! Exit-status contract of the binary: a clean run exits 0, a detected
//! violation surfaces as an error from the library and exits 1. The tests
//! below capture the structured `Violation` directly instead of spawning
//! the binary, so no test depends on process-termination semantics.

use tearcheck::{runner, Directory, RunOptions};

#[test]
fn guarded_run_stays_consistent() {
    let directory = Directory::staff();
    let options = RunOptions {
        guarded: true,
        iterations: 60_000,
    };
    let report = runner::run(&directory, &options).expect("guarded run must never tear");
    assert_eq!(report.iterations, 60_000);
}

// The race is probabilistic by nature: a single unguarded run is very
// likely, but not guaranteed, to tear within the budget. A bounded number
// of attempts keeps the test honest without flaking.
#[test]
fn unguarded_run_detects_a_torn_copy() {
    let directory = Directory::staff();
    let options = RunOptions {
        guarded: false,
        iterations: 60_000,
    };

    let violation = (0..8)
        .find_map(|_| runner::run(&directory, &options).err())
        .expect("no torn copy observed across eight unguarded runs");

    match violation {
        runner::RunError::Violation(violation) => {
            // Fail-fast: detection happened strictly inside the budget and
            // the verifier stopped there.
            assert!(violation.iteration() < 60_000);
        }
        other => panic!("unexpected run failure: {other}"),
    }
}

#[test]
fn directory_is_untouched_by_a_full_run() {
    let directory = Directory::staff();
    let before = directory.clone();

    let options = RunOptions {
        guarded: true,
        iterations: 10_000,
    };
    runner::run(&directory, &options).expect("guarded run must never tear");

    assert_eq!(directory, before);
}

// Scoped threads make the teardown ordering structural: `run` cannot return
// until every writer is joined, and the guard is dropped after that. Two
// back-to-back runs double as a check that teardown leaves nothing behind.
#[test]
fn runs_tear_down_cleanly_and_are_repeatable() {
    let directory = Directory::staff();
    let options = RunOptions {
        guarded: true,
        iterations: 5_000,
    };
    runner::run(&directory, &options).expect("first run");
    runner::run(&directory, &options).expect("second run");
}
