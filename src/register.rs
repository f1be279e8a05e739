//! The shared register and the copy-update primitive.
//!
//! The register is the one mutable composite value in the system. Each field
//! lives in its own cell, so a copy that is not wrapped in the guard
//! interleaves with concurrent copies at exactly field granularity: every
//! individual field stays well-formed, but the composite can end up mixing
//! two source records (a torn copy). Wrapping the whole field sequence in
//! the guard is what rules those mixtures out.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::directory::Record;
use crate::guard::{Guard, GuardError};

/// One field of the register. The per-field lock keeps individual reads and
/// writes well-formed without saying anything about the composite.
#[derive(Debug)]
struct FieldCell<T>(Mutex<T>);

impl<T: Clone> FieldCell<T> {
    fn new(value: T) -> Self {
        FieldCell(Mutex::new(value))
    }

    fn set(&self, value: T) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    fn get(&self) -> T {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// The mutable composite record visible to every thread in the run.
#[derive(Debug)]
pub struct SharedRegister {
    identity_number: FieldCell<usize>,
    id_code: FieldCell<u32>,
    first_name: FieldCell<String>,
    last_name: FieldCell<String>,
    department: FieldCell<String>,
    room_number: FieldCell<u32>,
}

impl Default for SharedRegister {
    fn default() -> Self {
        SharedRegister::new()
    }
}

impl SharedRegister {
    /// Creates an unprimed register. The lifecycle primes it with a real
    /// directory entry before any verifier can observe it.
    pub fn new() -> Self {
        let blank = Record::default();
        SharedRegister {
            identity_number: FieldCell::new(blank.identity_number),
            id_code: FieldCell::new(blank.id_code),
            first_name: FieldCell::new(blank.first_name),
            last_name: FieldCell::new(blank.last_name),
            department: FieldCell::new(blank.department),
            room_number: FieldCell::new(blank.room_number),
        }
    }

    fn store_fields(&self, src: &Record) {
        self.identity_number.set(src.identity_number);
        self.id_code.set(src.id_code);
        self.first_name.set(src.first_name.clone());
        self.last_name.set(src.last_name.clone());
        self.department.set(src.department.clone());
        self.room_number.set(src.room_number);
    }

    fn load_fields(&self, dest: &mut Record) {
        dest.identity_number = self.identity_number.get();
        dest.id_code = self.id_code.get();
        dest.first_name = self.first_name.get();
        dest.last_name = self.last_name.get();
        dest.department = self.department.get();
        dest.room_number = self.room_number.get();
    }

    /// Copy-update into the register: every field of `src` is transferred.
    ///
    /// With a guard the transfer is one critical section and a concurrent
    /// copy can never observe or produce a half-written composite. Without
    /// one, field writes from concurrent stores interleave freely. If the
    /// guard cannot be acquired the call is abandoned and the register is
    /// left as it was; an invalidated guard is tolerated silently so that
    /// shutdown can proceed, anything else gets a diagnostic.
    pub fn store(&self, src: &Record, guard: Option<&Guard>) {
        match guard {
            Some(guard) => match guard.acquire() {
                Ok(_held) => self.store_fields(src),
                Err(GuardError::Invalidated) => {}
                Err(err) => warn!(%err, "abandoning register write"),
            },
            None => self.store_fields(src),
        }
    }

    /// Copy-update out of the register into a caller-local snapshot, under
    /// the same guarding rules as [`SharedRegister::store`]. On an abandoned
    /// acquisition the snapshot keeps its previous contents.
    pub fn load_into(&self, dest: &mut Record, guard: Option<&Guard>) {
        match guard {
            Some(guard) => match guard.acquire() {
                Ok(_held) => self.load_fields(dest),
                Err(GuardError::Invalidated) => {}
                Err(err) => warn!(%err, "abandoning register read"),
            },
            None => self.load_fields(dest),
        }
    }
}
