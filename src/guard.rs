//! The mutual-exclusion guard that makes composite copies atomic.

use std::sync::{Mutex, MutexGuard, TryLockError};

use thiserror::Error;

/// Why a guard acquisition did not hand out the lock.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GuardError {
    /// A previous holder failed mid-critical-section and the guard can no
    /// longer vouch for the data behind it. Expected during shutdown races
    /// and deliberately tolerated without a diagnostic.
    #[error("guard invalidated by a failed holder")]
    Invalidated,
    /// A non-blocking probe found the guard already held.
    #[error("guard already held")]
    WouldBlock,
}

/// A single process-wide lock. Created before any writer starts and dropped
/// only after the last writer has been joined; the type system enforces the
/// second half of that through the borrows held by [`Held`].
#[derive(Debug, Default)]
pub struct Guard {
    inner: Mutex<()>,
}

/// Proof of exclusive access. Releases the guard on drop.
#[must_use = "the critical section ends when this is dropped"]
#[derive(Debug)]
pub struct Held<'a> {
    _inner: MutexGuard<'a, ()>,
}

impl Guard {
    pub fn new() -> Self {
        Guard::default()
    }

    /// Blocks the calling thread until the guard is free.
    pub fn acquire(&self) -> Result<Held<'_>, GuardError> {
        match self.inner.lock() {
            Ok(inner) => Ok(Held { _inner: inner }),
            Err(_) => Err(GuardError::Invalidated),
        }
    }

    /// Non-blocking probe: takes the guard if it is free, otherwise reports
    /// [`GuardError::WouldBlock`] immediately.
    pub fn try_acquire(&self) -> Result<Held<'_>, GuardError> {
        match self.inner.try_lock() {
            Ok(inner) => Ok(Held { _inner: inner }),
            Err(TryLockError::WouldBlock) => Err(GuardError::WouldBlock),
            Err(TryLockError::Poisoned(_)) => Err(GuardError::Invalidated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn acquire_and_release() {
        let guard = Guard::new();
        drop(guard.acquire().unwrap());
        drop(guard.acquire().unwrap());
    }

    #[test]
    fn probe_refuses_while_held() {
        let guard = Guard::new();
        let held = guard.acquire().unwrap();
        assert_eq!(guard.try_acquire().unwrap_err(), GuardError::WouldBlock);
        drop(held);
        assert!(guard.try_acquire().is_ok());
    }

    #[test]
    fn panicking_holder_invalidates_the_guard() {
        let guard = Guard::new();
        thread::scope(|s| {
            let handle = s.spawn(|| {
                let _held = guard.acquire().unwrap();
                panic!("holder dies mid-critical-section");
            });
            assert!(handle.join().is_err());
        });
        assert_eq!(guard.acquire().unwrap_err(), GuardError::Invalidated);
        assert_eq!(guard.try_acquire().unwrap_err(), GuardError::Invalidated);
    }
}
