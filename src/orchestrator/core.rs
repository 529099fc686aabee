//! # Orchestrator: dependency-ordered subsystem bring-up.
//!
//! The [`Orchestrator`] owns the registry of [`SubsystemSpec`]s and drives
//! every registered subsystem, transitively through its dependencies, toward a
//! requested status. Bring-up is two-phase: `setup()` targets Ready, then
//! `start()` targets Running.
//!
//! ## Walk
//! ```text
//! setup()/start():
//!   ├─ check_cycles()                → Err(DependencyCycle) on a true cycle
//!   ├─ for each root spec            (reverse registration order)
//!   │    descend(spec, desired, 0):
//!   │      ├─ depth == DEPTH_CEILING → stop (stack-safety net)
//!   │      ├─ recurse dependencies   (declared order; unresolved → warn, skip)
//!   │      ├─ status == desired
//!   │      │  or terminal            → no-op
//!   │      ├─ Ready   wanted, Init   → subsystem.setup()
//!   │      ├─ Running wanted, Ready  → subsystem.start()
//!   │      └─ anything else          → no-op (start never promotes from Init)
//!   └─ own status → desired
//! ```
//!
//! ## Rules
//! - The walk covers *root* specs — subsystems no other spec depends on —
//!   so everything else is reached in dependency order through descent.
//! - Terminal statuses (Fault, Stopped) are settled: repeated `setup()` or
//!   `start()` calls never retry them.
//! - The orchestrator is driven from one initialization task; `register`
//!   takes `&mut self`, and concurrent `setup()`/`start()` is out of contract.
//! - The depth ceiling keeps stack usage bounded on malformed graphs; real
//!   cycles are rejected up front by the tricolor pre-check.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::BoxFuture;
use log::{debug, warn};

use crate::error::OrchestratorError;
use crate::lifecycle::{Status, StatusCell};
use crate::orchestrator::spec::{SubsystemRef, SubsystemSpec};

/// Maximum dependency descent depth.
///
/// A stack-safety net for buggy configurations, not cycle detection: a chain
/// deeper than this leaves its tail short of the desired status (with a
/// warning), while true cycles are rejected before the walk begins.
pub const DEPTH_CEILING: usize = 8;

fn key(subsystem: &SubsystemRef) -> usize {
    Arc::as_ptr(subsystem) as *const () as usize
}

/// Registry of subsystem specs and the bring-up walk over them.
///
/// # Example
/// ```no_run
/// use subvisor::{Orchestrator, SubsystemRef, SubsystemSpec};
/// # fn subsystems() -> (SubsystemRef, SubsystemRef) { unimplemented!() }
///
/// # async fn bring_up() -> Result<(), subvisor::OrchestratorError> {
/// let (store, telemetry) = subsystems();
///
/// let mut orchestrator = Orchestrator::new();
/// orchestrator.register(SubsystemSpec::new(store.clone()));
/// orchestrator.register(SubsystemSpec::new(telemetry).depends_on(store));
///
/// orchestrator.setup().await?;
/// orchestrator.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator {
    specs: Vec<SubsystemSpec>,
    index: HashMap<usize, usize>,
    cell: StatusCell,
}

impl Orchestrator {
    /// Creates an empty orchestrator in [`Status::Init`].
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            index: HashMap::new(),
            cell: StatusCell::new(),
        }
    }

    /// Registers a spec.
    ///
    /// Registration is not deduplicated: registering the same subsystem twice
    /// keeps both entries and both are walked; identity lookups during descent
    /// resolve to the most recent registration. Call before `setup()` —
    /// `&mut self` rules out registration during a walk.
    pub fn register(&mut self, spec: SubsystemSpec) {
        debug!(
            "register '{}' ({} dependencies)",
            spec.subsystem().name(),
            spec.deps().len()
        );
        self.index.insert(key(spec.subsystem()), self.specs.len());
        self.specs.push(spec);
    }

    /// Number of registered specs.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Returns the orchestrator's own status.
    pub async fn status(&self) -> Status {
        self.cell.get().await
    }

    /// Drives every registered subsystem, dependencies first, toward
    /// [`Status::Ready`], then marks the orchestrator itself Ready.
    ///
    /// Idempotent: subsystems already Ready (or terminal) are left alone, so a
    /// repeated call invokes no subsystem's `setup()` twice.
    pub async fn setup(&self) -> Result<Status, OrchestratorError> {
        self.check_cycles()?;
        self.walk(Status::Ready).await;
        self.cell.set(Status::Ready).await;
        Ok(self.cell.get().await)
    }

    /// Same walk as [`setup`](Self::setup) with target [`Status::Running`].
    ///
    /// Only promotes subsystems already in Ready; a subsystem whose `setup()`
    /// never completed stays in Init.
    pub async fn start(&self) -> Result<Status, OrchestratorError> {
        self.check_cycles()?;
        self.walk(Status::Running).await;
        self.cell.set(Status::Running).await;
        Ok(self.cell.get().await)
    }

    async fn walk(&self, desired: Status) {
        for idx in self.roots().into_iter().rev() {
            self.descend(idx, desired, 0).await;
        }
    }

    /// Indices of specs whose subsystem appears in no dependency list,
    /// in registration order.
    fn roots(&self) -> Vec<usize> {
        let depended: HashSet<usize> = self
            .specs
            .iter()
            .flat_map(|spec| spec.deps().iter().map(key))
            .collect();

        (0..self.specs.len())
            .filter(|&idx| !depended.contains(&key(self.specs[idx].subsystem())))
            .collect()
    }

    fn descend(&self, idx: usize, desired: Status, depth: usize) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let spec = &self.specs[idx];
            if depth >= DEPTH_CEILING {
                warn!(
                    "depth ceiling {} reached at '{}'; leaving its subtree untouched",
                    DEPTH_CEILING,
                    spec.subsystem().name()
                );
                return;
            }

            for dep in spec.deps() {
                match self.index.get(&key(dep)) {
                    Some(&dep_idx) => self.descend(dep_idx, desired, depth + 1).await,
                    None => warn!(
                        "'{}' depends on unregistered '{}'; skipping",
                        spec.subsystem().name(),
                        dep.name()
                    ),
                }
            }

            let subsystem = spec.subsystem();
            let current = subsystem.status().await;
            if current == desired || current.is_terminal() {
                return;
            }

            match (desired, current) {
                (Status::Ready, Status::Init) => {
                    let settled = subsystem.setup().await;
                    debug!("setup '{}' -> {}", subsystem.name(), settled);
                }
                (Status::Running, Status::Ready) => {
                    let settled = subsystem.start().await;
                    debug!("start '{}' -> {}", subsystem.name(), settled);
                }
                _ => {}
            }
        })
    }

    /// Tricolor depth-first search over the registry.
    ///
    /// Iterative (explicit stack) so a pathological graph cannot overflow the
    /// call stack. Unresolved dependency references do not participate.
    fn check_cycles(&self) -> Result<(), OrchestratorError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut color = vec![Color::White; self.specs.len()];

        for origin in 0..self.specs.len() {
            if color[origin] != Color::White {
                continue;
            }
            color[origin] = Color::Gray;
            let mut stack: Vec<(usize, usize)> = vec![(origin, 0)];

            while let Some(frame) = stack.last_mut() {
                let idx = frame.0;
                let cursor = frame.1;
                frame.1 += 1;

                let deps = self.specs[idx].deps();
                if cursor >= deps.len() {
                    color[idx] = Color::Black;
                    stack.pop();
                    continue;
                }

                let Some(&dep_idx) = self.index.get(&key(&deps[cursor])) else {
                    continue;
                };
                match color[dep_idx] {
                    Color::White => {
                        color[dep_idx] = Color::Gray;
                        stack.push((dep_idx, 0));
                    }
                    Color::Gray => {
                        let entry = stack
                            .iter()
                            .position(|&(i, _)| i == dep_idx)
                            .unwrap_or(0);
                        let mut path: Vec<String> = stack[entry..]
                            .iter()
                            .map(|&(i, _)| self.specs[i].subsystem().name().to_string())
                            .collect();
                        path.push(self.specs[dep_idx].subsystem().name().to_string());
                        return Err(OrchestratorError::DependencyCycle { path });
                    }
                    Color::Black => {}
                }
            }
        }
        Ok(())
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::lifecycle::{start_direct, StartupJitter, Subsystem, Worker};

    type Trace = Arc<Mutex<Vec<String>>>;

    /// Tickable-style subsystem recording its setup calls.
    struct Probe {
        name: &'static str,
        cell: StatusCell,
        setup_calls: AtomicUsize,
        setup_result: Status,
        trace: Option<Trace>,
    }

    impl Probe {
        fn arc(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                cell: StatusCell::new(),
                setup_calls: AtomicUsize::new(0),
                setup_result: Status::Ready,
                trace: None,
            })
        }

        fn faulty(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                cell: StatusCell::new(),
                setup_calls: AtomicUsize::new(0),
                setup_result: Status::Fault,
                trace: None,
            })
        }

        fn traced(name: &'static str, trace: &Trace) -> Arc<Self> {
            Arc::new(Self {
                name,
                cell: StatusCell::new(),
                setup_calls: AtomicUsize::new(0),
                setup_result: Status::Ready,
                trace: Some(Arc::clone(trace)),
            })
        }
    }

    #[async_trait]
    impl Subsystem for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn status_cell(&self) -> &StatusCell {
            &self.cell
        }

        async fn setup(&self) -> Status {
            self.setup_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(trace) = &self.trace {
                trace.lock().unwrap().push(self.name.to_string());
            }
            self.set_status(self.setup_result).await;
            self.status().await
        }

        async fn start(&self) -> Status {
            start_direct(self).await
        }
    }

    /// Worker-owning subsystem.
    struct ThreadedProbe {
        name: &'static str,
        cell: StatusCell,
        worker: Worker,
    }

    impl ThreadedProbe {
        fn arc(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                cell: StatusCell::new(),
                worker: Worker::new(async {
                    loop {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                })
                .with_jitter(StartupJitter::new(
                    Duration::from_millis(1),
                    Duration::from_millis(1),
                )),
            })
        }
    }

    #[async_trait]
    impl Subsystem for ThreadedProbe {
        fn name(&self) -> &str {
            self.name
        }

        fn status_cell(&self) -> &StatusCell {
            &self.cell
        }

        async fn setup(&self) -> Status {
            self.set_status(Status::Ready).await;
            self.status().await
        }

        async fn start(&self) -> Status {
            self.worker.spawn(&self.cell).await
        }
    }

    #[tokio::test]
    async fn threaded_two_phase_bring_up() {
        let a = ThreadedProbe::arc("a");
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(a.clone()));

        assert_eq!(orchestrator.setup().await.unwrap(), Status::Ready);
        assert_eq!(a.status().await, Status::Ready);

        assert_eq!(orchestrator.start().await.unwrap(), Status::Running);
        assert_eq!(a.status().await, Status::Running);
    }

    #[tokio::test]
    async fn start_without_setup_leaves_init() {
        let b = ThreadedProbe::arc("b");
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(b.clone()));

        orchestrator.start().await.unwrap();
        assert_eq!(b.status().await, Status::Init, "start never promotes from Init");
    }

    #[tokio::test]
    async fn setup_is_idempotent() {
        let a = Probe::arc("a");
        let b = Probe::arc("b");
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(a.clone()));
        orchestrator.register(SubsystemSpec::new(b.clone()).depends_on(a.clone()));

        orchestrator.setup().await.unwrap();
        orchestrator.setup().await.unwrap();

        assert_eq!(a.setup_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.setup_calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.status().await, Status::Ready);
        assert_eq!(b.status().await, Status::Ready);
    }

    #[tokio::test]
    async fn dependencies_settle_before_dependents() {
        let trace: Trace = Arc::new(Mutex::new(Vec::new()));
        let store = Probe::traced("store", &trace);
        let bus = Probe::traced("bus", &trace);
        let app = Probe::traced("app", &trace);

        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(store.clone()));
        orchestrator.register(SubsystemSpec::new(bus.clone()).depends_on(store.clone()));
        orchestrator.register(
            SubsystemSpec::new(app.clone())
                .depends_on(bus.clone())
                .depends_on(store.clone()),
        );

        orchestrator.setup().await.unwrap();

        let order = trace.lock().unwrap().clone();
        assert_eq!(order, vec!["store", "bus", "app"]);
    }

    #[tokio::test]
    async fn independent_roots_walk_in_reverse_registration_order() {
        let trace: Trace = Arc::new(Mutex::new(Vec::new()));
        let first = Probe::traced("first", &trace);
        let second = Probe::traced("second", &trace);

        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(first.clone()));
        orchestrator.register(SubsystemSpec::new(second.clone()));

        orchestrator.setup().await.unwrap();

        let order = trace.lock().unwrap().clone();
        assert_eq!(order, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn unresolved_dependency_is_skipped() {
        let c = Probe::arc("c");
        let ghost = Probe::arc("ghost"); // never registered

        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(c.clone()).depends_on(ghost.clone()));

        orchestrator.setup().await.unwrap();
        assert_eq!(c.status().await, Status::Ready);
        assert_eq!(ghost.status().await, Status::Init);
    }

    #[tokio::test]
    async fn depth_ceiling_leaves_chain_tail_in_init() {
        let probes: Vec<Arc<Probe>> = (0..10)
            .map(|i| {
                Probe::arc(Box::leak(format!("s{i}").into_boxed_str()))
            })
            .collect();

        let mut orchestrator = Orchestrator::new();
        // s0 depends on s1 depends on ... depends on s9.
        for i in 0..10 {
            let mut spec = SubsystemSpec::new(probes[i].clone());
            if i + 1 < 10 {
                spec = spec.depends_on(probes[i + 1].clone());
            }
            orchestrator.register(spec);
        }

        orchestrator.setup().await.unwrap();

        for (i, probe) in probes.iter().enumerate() {
            let expected = if i < DEPTH_CEILING { Status::Ready } else { Status::Init };
            assert_eq!(
                probe.status().await,
                expected,
                "s{i} settled in the wrong state"
            );
        }
    }

    #[tokio::test]
    async fn cycle_is_reported_before_the_walk() {
        let a = Probe::arc("a");
        let b = Probe::arc("b");

        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(a.clone()).depends_on(b.clone()));
        orchestrator.register(SubsystemSpec::new(b.clone()).depends_on(a.clone()));

        let err = orchestrator.setup().await.unwrap_err();
        let OrchestratorError::DependencyCycle { path } = err;
        assert!(path.contains(&"a".to_string()));
        assert!(path.contains(&"b".to_string()));
        assert_eq!(a.setup_calls.load(Ordering::SeqCst), 0, "walk must not run");
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_both_entries() {
        let a = Probe::arc("a");
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(a.clone()));
        orchestrator.register(SubsystemSpec::new(a.clone()));
        assert_eq!(orchestrator.len(), 2);

        orchestrator.setup().await.unwrap();
        // Second visit finds the subsystem already Ready.
        assert_eq!(a.setup_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fault_is_settled_and_never_retried() {
        let broken = Probe::faulty("broken");
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(broken.clone()));

        orchestrator.setup().await.unwrap();
        assert_eq!(broken.status().await, Status::Fault);

        orchestrator.setup().await.unwrap();
        orchestrator.start().await.unwrap();
        assert_eq!(broken.setup_calls.load(Ordering::SeqCst), 1);
        assert_eq!(broken.status().await, Status::Fault);
    }

    #[tokio::test]
    async fn orchestrator_reports_its_own_status() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(SubsystemSpec::new(Probe::arc("a")));

        assert_eq!(orchestrator.status().await, Status::Init);
        assert_eq!(orchestrator.setup().await.unwrap(), Status::Ready);
        assert_eq!(orchestrator.start().await.unwrap(), Status::Running);
        assert_eq!(orchestrator.status().await, Status::Running);
    }
}
