//! Dependency-ordered bring-up: specs, registry, and the walk.
//!
//! ## Contents
//! - [`SubsystemSpec`], [`SubsystemRef`] — one subsystem plus its declared
//!   direct dependencies
//! - [`Orchestrator`] — the registry and the recursive descent that drives
//!   every subsystem toward Ready, then Running
//! - [`DEPTH_CEILING`] — stack-safety bound on descent depth
//!
//! Registration happens once at initialization; the walk is driven from a
//! single task. See `core.rs` for the walk rules.

mod core;
mod spec;

pub use self::core::{Orchestrator, DEPTH_CEILING};
pub use spec::{SubsystemRef, SubsystemSpec};
