//! Snapshot verification: cross-field consistency against the directory.
//!
//! The verifier proves a safety property, so it fails fast: the first
//! inconsistent snapshot falsifies the run and nothing after it matters.

use std::fmt;

use thiserror::Error;
use tracing::{error, info};

use crate::directory::{Directory, Record};
use crate::guard::Guard;
use crate::register::SharedRegister;

/// Iteration budget used by the reference runs.
pub const DEFAULT_ITERATIONS: u32 = 60_000;

const PROGRESS_EVERY: u32 = 10_000;

/// The first cross-field inconsistency observed in a snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    /// The snapshot's identity number resolves to no directory entry.
    /// Possible only through a torn copy, so it counts as a detected
    /// inconsistency rather than a lookup bug.
    #[error("iteration {iteration}: identity number {identity_number} has no directory entry")]
    UnknownIdentity {
        iteration: u32,
        identity_number: usize,
    },
    /// A snapshot field differs from the directory entry its identity
    /// number names.
    #[error("iteration {iteration}: mismatching '{field}', {observed} != {expected}")]
    FieldMismatch {
        iteration: u32,
        field: &'static str,
        observed: String,
        expected: String,
    },
}

impl Violation {
    /// The field the mismatch was detected on, in field-check order.
    pub fn field(&self) -> &'static str {
        match self {
            Violation::UnknownIdentity { .. } => "identity_number",
            Violation::FieldMismatch { field, .. } => field,
        }
    }

    /// The verifier iteration the mismatch was detected at.
    pub fn iteration(&self) -> u32 {
        match self {
            Violation::UnknownIdentity { iteration, .. } => *iteration,
            Violation::FieldMismatch { iteration, .. } => *iteration,
        }
    }
}

/// A verification run that exhausted its budget without finding a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyReport {
    pub iterations: u32,
}

fn mismatch<T: fmt::Display>(
    iteration: u32,
    field: &'static str,
    observed: &T,
    expected: &T,
) -> Violation {
    Violation::FieldMismatch {
        iteration,
        field,
        observed: observed.to_string(),
        expected: expected.to_string(),
    }
}

/// Checks one snapshot against the directory entry its identity number
/// names. Fields are checked in declaration order and the first mismatch
/// wins.
pub fn check_snapshot(
    directory: &Directory,
    snapshot: &Record,
    iteration: u32,
) -> Result<(), Violation> {
    let Some(expected) = directory.get(snapshot.identity_number) else {
        return Err(Violation::UnknownIdentity {
            iteration,
            identity_number: snapshot.identity_number,
        });
    };
    if snapshot.id_code != expected.id_code {
        return Err(mismatch(iteration, "id_code", &snapshot.id_code, &expected.id_code));
    }
    if snapshot.first_name != expected.first_name {
        return Err(mismatch(iteration, "first_name", &snapshot.first_name, &expected.first_name));
    }
    if snapshot.last_name != expected.last_name {
        return Err(mismatch(iteration, "last_name", &snapshot.last_name, &expected.last_name));
    }
    if snapshot.department != expected.department {
        return Err(mismatch(iteration, "department", &snapshot.department, &expected.department));
    }
    if snapshot.room_number != expected.room_number {
        return Err(mismatch(iteration, "room_number", &snapshot.room_number, &expected.room_number));
    }
    Ok(())
}

/// Repeatedly snapshots the register and validates cross-field consistency,
/// stopping at the first violation.
pub fn verify(
    register: &SharedRegister,
    directory: &Directory,
    guard: Option<&Guard>,
    iterations: u32,
) -> Result<VerifyReport, Violation> {
    let mut snapshot = Record::default();
    for iteration in 0..iterations {
        register.load_into(&mut snapshot, guard);
        if let Err(violation) = check_snapshot(directory, &snapshot, iteration) {
            error!(%violation, "consistency violation detected");
            return Err(violation);
        }
        if iteration > 0 && iteration % PROGRESS_EVERY == 0 {
            info!(iteration, "snapshots consistent so far");
        }
    }
    info!(iterations, "verification completed without inconsistency");
    Ok(VerifyReport { iterations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;

    #[test]
    fn consistent_snapshot_passes() {
        let directory = Directory::staff();
        let snapshot = directory.entries()[0].clone();
        assert_eq!(check_snapshot(&directory, &snapshot, 0), Ok(()));
    }

    #[test]
    fn cross_entry_department_is_flagged() {
        let directory = Directory::staff();
        let mut snapshot = directory.entries()[0].clone();
        snapshot.department = "Programmers".to_owned();

        let violation = check_snapshot(&directory, &snapshot, 7).unwrap_err();
        assert_eq!(violation.field(), "department");
        assert_eq!(violation.iteration(), 7);
    }

    #[test]
    fn first_mismatch_in_field_order_wins() {
        let directory = Directory::staff();
        let mut snapshot = directory.entries()[1].clone();
        snapshot.id_code = 12_345_678;
        snapshot.department = "Accounting".to_owned();

        let violation = check_snapshot(&directory, &snapshot, 0).unwrap_err();
        assert_eq!(violation.field(), "id_code");
    }

    #[test]
    fn out_of_range_identity_is_a_violation_not_a_panic() {
        let directory = Directory::staff();
        let mut snapshot = directory.entries()[0].clone();
        snapshot.identity_number = 9;

        let violation = check_snapshot(&directory, &snapshot, 3).unwrap_err();
        assert_eq!(violation.field(), "identity_number");
    }
}
