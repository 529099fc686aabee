//! # Reader-preferring read/write lock with fixed reader capacity.
//!
//! [`ReadWriteLock`] admits up to [`MAX_READERS`] concurrent readers or one
//! exclusive writer. It is built from two primitives:
//!
//! - a counting semaphore holding [`MAX_READERS`] reader admission units;
//! - a mutex serializing writers against each other.
//!
//! ## Algorithm
//! ```text
//! read:    acquire 1 admission unit            → ReadGuard
//! write:   lock writer token                   (serializes writers)
//!          acquire all 8 admission units       (waits for reader drain)
//!                                              → WriteGuard
//! drop(ReadGuard):   return 1 unit
//! drop(WriteGuard):  return all 8 units, release writer token
//! ```
//!
//! Readers proceed freely until a writer arrives; the writer then waits for
//! every admitted reader to release. Writers are serialized by the token, so
//! two writers can never drain the admission pool concurrently.
//!
//! ## Rules
//! - `read()`/`write()` wait without timeout. Re-entrant acquisition from the
//!   same task (e.g. `write()` while holding a `ReadGuard`) deadlocks; that is
//!   a caller error and is not detected.
//! - No FIFO guarantee between writers: the token is a plain mutex.
//! - `try_read()`/`try_write()` report unavailability as [`TryLockError`]
//!   instead of waiting.

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};

use tokio::sync::{Mutex, MutexGuard, Semaphore};

use crate::error::TryLockError;

/// Fixed reader admission capacity of every [`ReadWriteLock`].
pub const MAX_READERS: u32 = 8;

/// Many-readers / one-writer lock owning the value it protects.
///
/// One instance guards one subsystem's status field; the same primitive backs
/// [`DataHub`](crate::DataHub). Guards release admission on drop, so a lock
/// cannot be left held by early returns.
pub struct ReadWriteLock<T> {
    readers: Semaphore,
    writer: Mutex<()>,
    value: UnsafeCell<T>,
}

// ReadGuard hands out &T to up to MAX_READERS tasks, WriteGuard hands out
// &mut T to exactly one; the admission units make those aliasing rules hold.
unsafe impl<T: Send> Send for ReadWriteLock<T> {}
unsafe impl<T: Send + Sync> Sync for ReadWriteLock<T> {}

impl<T> ReadWriteLock<T> {
    /// Creates a lock protecting `value`, with all admission units available.
    pub fn new(value: T) -> Self {
        Self {
            readers: Semaphore::new(MAX_READERS as usize),
            writer: Mutex::new(()),
            value: UnsafeCell::new(value),
        }
    }

    /// Acquires read admission, waiting until a unit is available.
    ///
    /// Up to [`MAX_READERS`] guards can be live at once; the next caller waits
    /// until one of them drops.
    pub async fn read(&self) -> ReadGuard<'_, T> {
        let permit = self
            .readers
            .acquire()
            .await
            .expect("reader semaphore never closed");
        permit.forget();
        ReadGuard { lock: self }
    }

    /// Acquires exclusive write admission.
    ///
    /// Takes the writer token first, then drains all [`MAX_READERS`] admission
    /// units, waiting until every current reader has released.
    pub async fn write(&self) -> WriteGuard<'_, T> {
        let gate = self.writer.lock().await;
        let permits = self
            .readers
            .acquire_many(MAX_READERS)
            .await
            .expect("reader semaphore never closed");
        permits.forget();
        WriteGuard { lock: self, _gate: gate }
    }

    /// Attempts read admission without waiting.
    pub fn try_read(&self) -> Result<ReadGuard<'_, T>, TryLockError> {
        match self.readers.try_acquire() {
            Ok(permit) => {
                permit.forget();
                Ok(ReadGuard { lock: self })
            }
            Err(_) => Err(TryLockError(())),
        }
    }

    /// Attempts exclusive write admission without waiting.
    ///
    /// Fails if another writer holds the token or any reader is admitted.
    pub fn try_write(&self) -> Result<WriteGuard<'_, T>, TryLockError> {
        let gate = self.writer.try_lock().map_err(|_| TryLockError(()))?;
        match self.readers.try_acquire_many(MAX_READERS) {
            Ok(permits) => {
                permits.forget();
                Ok(WriteGuard { lock: self, _gate: gate })
            }
            Err(_) => Err(TryLockError(())),
        }
    }

    /// Consumes the lock, returning the protected value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadWriteLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_read() {
            Ok(guard) => f.debug_struct("ReadWriteLock").field("value", &*guard).finish(),
            Err(_) => f.debug_struct("ReadWriteLock").field("value", &"<locked>").finish(),
        }
    }
}

/// Shared access to the protected value; one admission unit, returned on drop.
pub struct ReadGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Holding an admission unit: no writer can be active.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.readers.add_permits(1);
    }
}

/// Exclusive access to the protected value; all admission units plus the
/// writer token, returned on drop.
pub struct WriteGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
    _gate: MutexGuard<'a, ()>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Holding every admission unit: no reader can be active.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        // Units first, token second (the token falls out of scope after this body).
        self.lock.readers.add_permits(MAX_READERS as usize);
    }
}
