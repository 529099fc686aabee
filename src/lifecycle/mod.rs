//! Subsystem lifecycle: status, contract, and variants.
//!
//! ## Contents
//! - [`Status`], [`StatusCell`] — the five-state machine and its lock-guarded holder
//! - [`Subsystem`] — the contract every subsystem implements
//! - [`Tickable`], [`start_direct`] — externally-driven variant
//! - [`Worker`], [`StartupJitter`] — worker provisioning for threaded variants
//!
//! Variants are composed, not inherited: a tickable subsystem uses
//! [`start_direct`] as its starter, a threaded one owns a [`Worker`].

mod jitter;
mod status;
mod subsystem;
mod tickable;
mod worker;

pub use jitter::StartupJitter;
pub use status::{Status, StatusCell};
pub use subsystem::Subsystem;
pub use tickable::{start_direct, Tickable};
pub use worker::Worker;
