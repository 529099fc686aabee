//! # Lifecycle status and its thread-safe holder.
//!
//! [`Status`] is the five-state lifecycle every subsystem moves through:
//!
//! ```text
//! Init ──setup()──► Ready ──start()──► Running ──► Stopped
//!   │                 │                   │
//!   └─────────────────┴───── Fault ◄──────┘
//! ```
//!
//! Fault and Stopped are terminal: the orchestrator never forces a transition
//! away from either. [`StatusCell`] holds one status behind a
//! [`ReadWriteLock`] and is the **only** mutation path for it — subsystems and
//! the orchestrator go through `get()`/`set()`, never a bare field.

use std::fmt;

use crate::sync::ReadWriteLock;

/// Lifecycle state of a subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Initial state; the only valid starting point.
    Init,
    /// `setup()` completed successfully.
    Ready,
    /// A fault occurred; terminal.
    Fault,
    /// Subsystem is performing its runtime duties.
    Running,
    /// Subsystem stopped normally; terminal.
    Stopped,
}

impl Status {
    /// Returns `true` for states the orchestrator never transitions away from.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Fault | Status::Stopped)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Status::Init => "init",
            Status::Ready => "ready",
            Status::Fault => "fault",
            Status::Running => "running",
            Status::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Concurrency-safe holder for one subsystem's [`Status`].
///
/// Each subsystem owns exactly one cell; its worker, the orchestrator, and
/// external pollers all go through it. Reads take read admission on the
/// underlying [`ReadWriteLock`] and release it promptly; writes take exclusive
/// admission.
#[derive(Debug)]
pub struct StatusCell {
    inner: ReadWriteLock<Status>,
}

impl StatusCell {
    /// Creates a cell in [`Status::Init`].
    pub fn new() -> Self {
        Self {
            inner: ReadWriteLock::new(Status::Init),
        }
    }

    /// Returns the current status under read admission.
    pub async fn get(&self) -> Status {
        *self.inner.read().await
    }

    /// Replaces the status under exclusive admission.
    pub async fn set(&self, next: Status) {
        *self.inner.write().await = next;
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}
