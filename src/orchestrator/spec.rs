//! # Subsystem specification: one subsystem plus its direct dependencies.

use std::sync::Arc;

use crate::lifecycle::Subsystem;

/// Shared handle to a registered subsystem.
///
/// The orchestrator resolves dependency references by `Arc` pointer identity:
/// a dependency entry refers to *that* instance, not to any subsystem with the
/// same name.
pub type SubsystemRef = Arc<dyn Subsystem>;

/// Pairing of one subsystem with its ordered direct dependencies.
///
/// Built by application code at initialization time, one per subsystem, and
/// handed to [`Orchestrator::register`](crate::Orchestrator::register).
/// Dependency order is preserved as declared and determines descent order.
///
/// # Example
/// ```no_run
/// use subvisor::{SubsystemRef, SubsystemSpec};
/// # fn subsystems() -> (SubsystemRef, SubsystemRef) { unimplemented!() }
///
/// let (store, telemetry): (SubsystemRef, SubsystemRef) = subsystems();
/// let spec = SubsystemSpec::new(telemetry).depends_on(store);
/// ```
#[derive(Clone)]
pub struct SubsystemSpec {
    subsystem: SubsystemRef,
    deps: Vec<SubsystemRef>,
}

impl SubsystemSpec {
    /// Creates a spec with no dependencies.
    pub fn new(subsystem: SubsystemRef) -> Self {
        Self {
            subsystem,
            deps: Vec::new(),
        }
    }

    /// Creates a spec with the given dependency list.
    pub fn with_deps(subsystem: SubsystemRef, deps: Vec<SubsystemRef>) -> Self {
        Self { subsystem, deps }
    }

    /// Appends one dependency reference (declared order is descent order).
    pub fn depends_on(mut self, dep: SubsystemRef) -> Self {
        self.deps.push(dep);
        self
    }

    /// The subsystem this spec registers.
    pub fn subsystem(&self) -> &SubsystemRef {
        &self.subsystem
    }

    /// Direct dependencies in declared order.
    pub fn deps(&self) -> &[SubsystemRef] {
        &self.deps
    }
}
