//! # Tickable subsystems.
//!
//! A tickable subsystem performs its per-cycle work in [`Tickable::tick`],
//! driven by an external periodic caller (a timer loop, a main loop — outside
//! this crate). It needs no worker of its own, so its `start()` is the trivial
//! promotion [`start_direct`]: straight to Running.

use async_trait::async_trait;

use crate::lifecycle::status::Status;
use crate::lifecycle::subsystem::Subsystem;

/// Subsystem variant that is called periodically instead of owning a worker.
#[async_trait]
pub trait Tickable: Subsystem {
    /// Performs one cycle of work.
    ///
    /// Invoked by an external periodic driver once the subsystem is Running.
    /// Returns the status after the cycle.
    async fn tick(&self) -> Status;
}

/// Trivial starter: promotes directly to [`Status::Running`].
///
/// No worker is provisioned. Use as the `start()` body of tickable subsystems
/// (and anything else that becomes operational the moment it is started).
pub async fn start_direct<S>(subsystem: &S) -> Status
where
    S: Subsystem + ?Sized,
{
    subsystem.set_status(Status::Running).await;
    subsystem.status().await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::lifecycle::status::StatusCell;

    struct Counter {
        cell: StatusCell,
        ticks: AtomicUsize,
    }

    #[async_trait]
    impl Subsystem for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn status_cell(&self) -> &StatusCell {
            &self.cell
        }

        async fn setup(&self) -> Status {
            self.set_status(Status::Ready).await;
            self.status().await
        }

        async fn start(&self) -> Status {
            start_direct(self).await
        }
    }

    #[async_trait]
    impl Tickable for Counter {
        async fn tick(&self) -> Status {
            self.ticks.fetch_add(1, Ordering::SeqCst);
            self.status().await
        }
    }

    #[tokio::test]
    async fn start_promotes_straight_to_running() {
        let sub = Counter {
            cell: StatusCell::new(),
            ticks: AtomicUsize::new(0),
        };

        assert_eq!(sub.setup().await, Status::Ready);
        assert_eq!(sub.start().await, Status::Running);

        // External driver calls tick; no worker exists.
        sub.tick().await;
        sub.tick().await;
        assert_eq!(sub.ticks.load(Ordering::SeqCst), 2);
        assert_eq!(sub.status().await, Status::Running);
    }
}
