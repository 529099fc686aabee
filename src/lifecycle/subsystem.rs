//! # Subsystem contract.
//!
//! [`Subsystem`] is the lifecycle contract every unit of application
//! functionality implements: a stable name, a [`StatusCell`] guarding its
//! status, a one-time `setup()`, and a variant-specific `start()`.
//!
//! Variants are expressed by composition, not inheritance:
//! - a *tickable* subsystem implements [`Tickable`](crate::Tickable) and uses
//!   [`start_direct`](crate::start_direct) as its `start()`;
//! - a *threaded* subsystem owns a [`Worker`](crate::Worker) and delegates
//!   `start()` to it.

use async_trait::async_trait;

use crate::lifecycle::status::{Status, StatusCell};

/// # Unit of application functionality with an observable lifecycle.
///
/// Implementations are typically created once at program start, registered
/// with the [`Orchestrator`](crate::Orchestrator), and live for the process
/// lifetime. Status is queried and mutated only through the provided
/// [`status`](Subsystem::status)/[`set_status`](Subsystem::set_status)
/// accessors, which route through the subsystem's [`StatusCell`].
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use subvisor::{start_direct, Status, StatusCell, Subsystem};
///
/// struct Store {
///     cell: StatusCell,
/// }
///
/// #[async_trait]
/// impl Subsystem for Store {
///     fn name(&self) -> &str { "store" }
///
///     fn status_cell(&self) -> &StatusCell { &self.cell }
///
///     async fn setup(&self) -> Status {
///         // open files, allocate buffers...
///         self.set_status(Status::Ready).await;
///         self.status().await
///     }
///
///     async fn start(&self) -> Status {
///         start_direct(self).await
///     }
/// }
/// ```
#[async_trait]
pub trait Subsystem: Send + Sync + 'static {
    /// Returns a stable, human-readable subsystem name.
    fn name(&self) -> &str;

    /// Returns the cell guarding this subsystem's status.
    fn status_cell(&self) -> &StatusCell;

    /// Returns the current status (read admission on the cell's lock).
    async fn status(&self) -> Status {
        self.status_cell().get().await
    }

    /// Replaces the status (exclusive admission on the cell's lock).
    ///
    /// The sole mutation path; implementations must not cache or bypass it.
    async fn set_status(&self, next: Status) {
        self.status_cell().set(next).await
    }

    /// One-time initialization.
    ///
    /// Expected to settle the status in [`Status::Ready`] on success or
    /// [`Status::Fault`] on failure, and return the result.
    async fn setup(&self) -> Status;

    /// Brings the subsystem from [`Status::Ready`] into [`Status::Running`].
    ///
    /// Tickable subsystems promote directly; threaded subsystems provision
    /// their worker here. The orchestrator only invokes this when the current
    /// status is `Ready`.
    async fn start(&self) -> Status;
}
