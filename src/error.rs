//! Error types used by the subvisor core.
//!
//! This module defines the few places where the core reports a failure as a
//! value instead of a [`Status`](crate::Status) transition:
//!
//! - [`OrchestratorError`] — configuration errors detected before a bring-up walk.
//! - [`HubError`] — capacity errors raised by [`DataHub`](crate::DataHub).
//! - [`TryLockError`] — non-blocking lock admission was unavailable.
//!
//! Subsystem-level failures never surface here: a subsystem that cannot come
//! up settles in [`Status::Fault`](crate::Status::Fault) and callers detect it
//! by polling `status()`.

use thiserror::Error;

/// # Errors detected by the orchestrator before walking the registry.
///
/// A bring-up walk never produces these for individual subsystems; they
/// indicate that the registered dependency graph itself is unusable.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The registered specs form a true dependency cycle.
    ///
    /// `path` lists subsystem names along the cycle, ending with the repeated
    /// entry (`a -> b -> a`).
    #[error("dependency cycle: {}", path.join(" -> "))]
    DependencyCycle {
        /// Subsystem names along the detected cycle.
        path: Vec<String>,
    },
}

impl OrchestratorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use subvisor::OrchestratorError;
    ///
    /// let err = OrchestratorError::DependencyCycle { path: vec!["a".into(), "b".into(), "a".into()] };
    /// assert_eq!(err.as_label(), "orchestrator_dependency_cycle");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            OrchestratorError::DependencyCycle { .. } => "orchestrator_dependency_cycle",
        }
    }
}

/// # Errors produced by [`DataHub`](crate::DataHub).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HubError {
    /// The fixed subscriber table is full; the callback was not registered.
    #[error("subscriber capacity {capacity} exceeded")]
    CapacityExceeded {
        /// The fixed subscriber capacity of the hub.
        capacity: usize,
    },
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::CapacityExceeded { .. } => "hub_capacity_exceeded",
        }
    }
}

/// Non-blocking lock admission failed.
///
/// Returned by [`ReadWriteLock::try_read`](crate::ReadWriteLock::try_read) and
/// [`ReadWriteLock::try_write`](crate::ReadWriteLock::try_write) when the
/// requested admission is not immediately available. The blocking `read`/`write`
/// paths never produce this; they wait without timeout.
#[derive(Error, Debug)]
#[error("lock admission unavailable")]
pub struct TryLockError(pub(crate) ());
