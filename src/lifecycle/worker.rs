//! # Worker provisioning for threaded subsystems.
//!
//! A threaded subsystem owns a [`Worker`]: a one-shot holder for its worker
//! body plus the [`StartupJitter`] applied before the body runs. The
//! subsystem's `start()` delegates to [`Worker::spawn`].
//!
//! ## Provisioning flow
//! ```text
//! spawn(cell):
//!   ├─ status == Fault          → preserve Fault, nothing provisioned
//!   ├─ body already taken       → no-op, current status
//!   ├─ no runtime available     → Fault
//!   └─ task spawned:
//!        sleep(jitter) → body.await        cell → Running
//! ```
//!
//! ## Rules
//! - The body is contractually an unbounded loop; it is never expected to
//!   return, and nothing in the core can cancel it.
//! - The body slot is taken on first spawn: a second `spawn` on the same
//!   worker changes nothing and reports the current status.
//! - Status moves only through the [`StatusCell`]; the worker task itself
//!   never touches it.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use futures::future::BoxFuture;
use log::warn;
use tokio::runtime::Handle;
use tokio::time::sleep;

use crate::lifecycle::jitter::StartupJitter;
use crate::lifecycle::status::{Status, StatusCell};

/// One-shot worker provisioning owned by a threaded subsystem.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use subvisor::{Status, StatusCell, Subsystem, Worker};
///
/// struct Telemetry {
///     cell: StatusCell,
///     worker: Worker,
/// }
///
/// impl Telemetry {
///     fn new() -> Self {
///         Self {
///             cell: StatusCell::new(),
///             worker: Worker::new(async {
///                 loop {
///                     // sample, publish...
///                     tokio::time::sleep(Duration::from_secs(1)).await;
///                 }
///             }),
///         }
///     }
/// }
///
/// #[async_trait]
/// impl Subsystem for Telemetry {
///     fn name(&self) -> &str { "telemetry" }
///
///     fn status_cell(&self) -> &StatusCell { &self.cell }
///
///     async fn setup(&self) -> Status {
///         self.set_status(Status::Ready).await;
///         self.status().await
///     }
///
///     async fn start(&self) -> Status {
///         self.worker.spawn(&self.cell).await
///     }
/// }
/// ```
pub struct Worker {
    jitter: StartupJitter,
    body: Mutex<Option<BoxFuture<'static, ()>>>,
}

impl Worker {
    /// Creates a worker around `body`.
    ///
    /// The body captures whatever shared state it needs (`Arc`s, channels);
    /// it runs for the remaining process lifetime once spawned.
    pub fn new<F>(body: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            jitter: StartupJitter::default(),
            body: Mutex::new(Some(Box::pin(body))),
        }
    }

    /// Replaces the default startup jitter window.
    pub fn with_jitter(mut self, jitter: StartupJitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Provisions the worker and records the outcome in `cell`.
    ///
    /// Preserves [`Status::Fault`] untouched; transitions to
    /// [`Status::Running`] on success or to `Fault` when no runtime is
    /// available to host the task. Returns the resulting status.
    pub async fn spawn(&self, cell: &StatusCell) -> Status {
        if cell.get().await == Status::Fault {
            return Status::Fault;
        }

        let body = self
            .body
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(body) = body else {
            // Already provisioned.
            return cell.get().await;
        };

        match Handle::try_current() {
            Ok(runtime) => {
                let delay = self.jitter.delay();
                runtime.spawn(async move {
                    sleep(delay).await;
                    body.await;
                });
                cell.set(Status::Running).await;
            }
            Err(_) => {
                warn!("worker provisioning failed: no runtime available");
                cell.set(Status::Fault).await;
            }
        }
        cell.get().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn instant_jitter() -> StartupJitter {
        StartupJitter::new(Duration::from_millis(1), Duration::from_millis(1))
    }

    fn counting_worker(counter: &Arc<AtomicUsize>) -> Worker {
        let counter = Arc::clone(counter);
        Worker::new(async move {
            loop {
                counter.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_millis(10)).await;
            }
        })
        .with_jitter(instant_jitter())
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_runs_body_after_jitter() {
        let counter = Arc::new(AtomicUsize::new(0));
        let worker = counting_worker(&counter);
        let cell = StatusCell::new();
        cell.set(Status::Ready).await;

        assert_eq!(worker.spawn(&cell).await, Status::Running);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(counter.load(Ordering::SeqCst) > 0, "worker body never ran");
    }

    #[tokio::test]
    async fn fault_is_preserved_and_nothing_spawns() {
        let counter = Arc::new(AtomicUsize::new(0));
        let worker = counting_worker(&counter);
        let cell = StatusCell::new();
        cell.set(Status::Fault).await;

        assert_eq!(worker.spawn(&cell).await, Status::Fault);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_spawn_is_a_noop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let worker = counting_worker(&counter);
        let cell = StatusCell::new();
        cell.set(Status::Ready).await;

        assert_eq!(worker.spawn(&cell).await, Status::Running);
        assert_eq!(worker.spawn(&cell).await, Status::Running);
    }

    #[test]
    fn no_runtime_means_fault() {
        let counter = Arc::new(AtomicUsize::new(0));
        let worker = counting_worker(&counter);
        let cell = StatusCell::new();

        let status = futures::executor::block_on(async {
            cell.set(Status::Ready).await;
            worker.spawn(&cell).await
        });
        assert_eq!(status, Status::Fault);
    }
}
