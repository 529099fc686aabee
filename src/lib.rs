//! # subvisor
//!
//! **Subvisor** brings up a fixed set of cooperating subsystems in an order
//! that respects their declared dependencies, giving each one a
//! concurrency-safe lifecycle status visible to every other task.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//!     │ SubsystemSpec │   │ SubsystemSpec │   │ SubsystemSpec │
//!     │ (subsystem +  │   │ (subsystem +  │   │ (subsystem +  │
//!     │  direct deps) │   │  direct deps) │   │  direct deps) │
//!     └──────┬────────┘   └──────┬────────┘   └──────┬────────┘
//!            ▼                   ▼                   ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Orchestrator (bring-up walk)                                │
//! │  - registry: spec arena + identity index                     │
//! │  - cycle pre-check (tricolor DFS)                            │
//! │  - descend(): dependencies first, depth ceiling 8            │
//! └──────┬──────────────────┬──────────────────┬─────────────────┘
//!        ▼                  ▼                  ▼
//!  ┌────────────┐     ┌────────────┐     ┌────────────┐
//!  │ Subsystem  │     │ Subsystem  │     │ Subsystem  │
//!  │ StatusCell │     │ StatusCell │     │ StatusCell │
//!  └──────┬─────┘     └──────┬─────┘     └──────┬─────┘
//!         │ (threaded)       │ (tickable)       │
//!         ▼                  ▼                  ▼
//!     Worker task       external tick       Worker task
//!     (jitter, loop)    driver (caller)     (jitter, loop)
//! ```
//!
//! ### Lifecycle
//! ```text
//! register(spec) ... register(spec)        (once, at initialization)
//!
//! orchestrator.setup():
//!   check_cycles() ─► walk roots ─► descend deps-first ─► Init → Ready
//! orchestrator.start():
//!   check_cycles() ─► same walk            ─► Ready → Running
//!
//! per subsystem:
//!   Init ──setup()──► Ready ──start()──► Running ──► Stopped
//!     │                 │                   │
//!     └─────────────────┴────── Fault ◄─────┘        (Fault/Stopped terminal)
//! ```
//!
//! ## Features
//! | Area              | Description                                                       | Key types / traits                 |
//! |-------------------|-------------------------------------------------------------------|------------------------------------|
//! | **Lifecycle**     | Status machine and the contract every subsystem implements.      | [`Status`], [`StatusCell`], [`Subsystem`] |
//! | **Variants**      | Externally-ticked and worker-owning subsystems, by composition.  | [`Tickable`], [`start_direct`], [`Worker`], [`StartupJitter`] |
//! | **Orchestration** | Dependency-ordered two-phase bring-up over a static registry.    | [`Orchestrator`], [`SubsystemSpec`] |
//! | **Locking**       | Reader-preferring lock with fixed reader capacity.               | [`ReadWriteLock`], [`MAX_READERS`] |
//! | **Data sharing**  | Bounded publish/subscribe value container on the same lock.      | [`DataHub`], [`MAX_SUBSCRIBERS`]   |
//! | **Errors**        | Typed configuration and capacity errors.                         | [`OrchestratorError`], [`HubError`], [`TryLockError`] |
//!
//! Failure of an individual subsystem is never an error value: it is the
//! [`Status::Fault`] state, observed by polling. There is no cancellation and
//! no timeout anywhere in the core; a Running worker runs for the remaining
//! process lifetime.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use subvisor::{
//!     start_direct, Orchestrator, Status, StatusCell, Subsystem, SubsystemSpec,
//! };
//!
//! struct Store {
//!     cell: StatusCell,
//! }
//!
//! #[async_trait]
//! impl Subsystem for Store {
//!     fn name(&self) -> &str { "store" }
//!
//!     fn status_cell(&self) -> &StatusCell { &self.cell }
//!
//!     async fn setup(&self) -> Status {
//!         self.set_status(Status::Ready).await;
//!         self.status().await
//!     }
//!
//!     async fn start(&self) -> Status {
//!         start_direct(self).await
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Store { cell: StatusCell::new() });
//!
//!     let mut orchestrator = Orchestrator::new();
//!     orchestrator.register(SubsystemSpec::new(store.clone()));
//!
//!     assert_eq!(orchestrator.setup().await?, Status::Ready);
//!     assert_eq!(orchestrator.start().await?, Status::Running);
//!     assert_eq!(store.status().await, Status::Running);
//!     Ok(())
//! }
//! ```

mod error;
mod hub;
mod lifecycle;
mod orchestrator;
mod sync;

// ---- Public re-exports ----

pub use error::{HubError, OrchestratorError, TryLockError};
pub use hub::{DataHub, MAX_SUBSCRIBERS};
pub use lifecycle::{start_direct, StartupJitter, Status, StatusCell, Subsystem, Tickable, Worker};
pub use orchestrator::{Orchestrator, SubsystemRef, SubsystemSpec, DEPTH_CEILING};
pub use sync::{ReadGuard, ReadWriteLock, WriteGuard, MAX_READERS};
