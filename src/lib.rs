//! Demonstrates and verifies what mutual exclusion buys you for a
//! multi-field shared value.
//!
//! Writer threads continuously overwrite a single [`SharedRegister`] from an
//! immutable [`Directory`] of reference records while a verifier snapshots
//! the register and checks that every field of the snapshot belongs to the
//! same directory entry. With the [`Guard`] wrapped around each composite
//! copy the check never fails; without it, copies interleave at field
//! granularity and the verifier catches a torn copy almost immediately.
//!
//! Two smaller demos ride on the same guard abstraction: a shared-counter
//! tally exhibiting lost updates ([`counter`]) and a thread-lifecycle
//! showcase with typed join results ([`showcase`]).

pub mod counter;
pub mod directory;
pub mod guard;
pub mod register;
pub mod runner;
pub mod showcase;
pub mod verifier;

pub use directory::{Directory, Record};
pub use guard::{Guard, GuardError};
pub use register::SharedRegister;
pub use runner::{run, RunError, RunOptions};
pub use verifier::{VerifyReport, Violation};
