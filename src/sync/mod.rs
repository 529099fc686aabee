//! Synchronization primitives.
//!
//! One primitive lives here: [`ReadWriteLock`], the reader-preferring lock
//! every status cell and the [`DataHub`](crate::DataHub) are built on.

mod rwlock;

pub use rwlock::{ReadGuard, ReadWriteLock, WriteGuard, MAX_READERS};
