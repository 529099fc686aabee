//! # Dependency-ordered bring-up
//!
//! Demonstrates the core subvisor flow:
//! - A tickable subsystem and two threaded subsystems
//! - Dependency declaration via `SubsystemSpec`
//! - Two-phase bring-up: `setup()` then `start()`
//! - Status polling after each phase
//!
//! Run with: `RUST_LOG=debug cargo run --example bringup`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use subvisor::{
    start_direct, Orchestrator, Status, StatusCell, Subsystem, SubsystemSpec, Tickable, Worker,
};

/// Tickable storage stub: work happens in `tick()`, driven externally.
struct Store {
    cell: StatusCell,
    flushes: AtomicU64,
}

impl Store {
    fn arc() -> Arc<Self> {
        Arc::new(Self {
            cell: StatusCell::new(),
            flushes: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl Subsystem for Store {
    fn name(&self) -> &str {
        "store"
    }

    fn status_cell(&self) -> &StatusCell {
        &self.cell
    }

    async fn setup(&self) -> Status {
        println!("🗄️  store: opening");
        self.set_status(Status::Ready).await;
        self.status().await
    }

    async fn start(&self) -> Status {
        start_direct(self).await
    }
}

#[async_trait]
impl Tickable for Store {
    async fn tick(&self) -> Status {
        let n = self.flushes.fetch_add(1, Ordering::Relaxed) + 1;
        println!("🗄️  store: flush #{n}");
        self.status().await
    }
}

/// Threaded sampler: its worker loops forever, feeding a channel.
struct Sampler {
    cell: StatusCell,
    worker: Worker,
}

impl Sampler {
    fn arc(tx: mpsc::Sender<u64>) -> Arc<Self> {
        Arc::new(Self {
            cell: StatusCell::new(),
            worker: Worker::new(async move {
                let mut reading = 0u64;
                loop {
                    reading += 1;
                    if tx.send(reading).await.is_err() {
                        println!("📡 sampler: sink gone, idling");
                    }
                    tokio::time::sleep(Duration::from_millis(250)).await;
                }
            }),
        })
    }
}

#[async_trait]
impl Subsystem for Sampler {
    fn name(&self) -> &str {
        "sampler"
    }

    fn status_cell(&self) -> &StatusCell {
        &self.cell
    }

    async fn setup(&self) -> Status {
        println!("📡 sampler: calibrating");
        self.set_status(Status::Ready).await;
        self.status().await
    }

    async fn start(&self) -> Status {
        self.worker.spawn(&self.cell).await
    }
}

/// Threaded reporter: drains the sampler's channel. Depends on store + sampler.
struct Reporter {
    cell: StatusCell,
    worker: Worker,
}

impl Reporter {
    fn arc(rx: mpsc::Receiver<u64>) -> Arc<Self> {
        let mut rx = rx;
        Arc::new(Self {
            cell: StatusCell::new(),
            worker: Worker::new(async move {
                loop {
                    match rx.recv().await {
                        Some(reading) => println!("📰 reporter: reading={reading}"),
                        None => tokio::time::sleep(Duration::from_secs(1)).await,
                    }
                }
            }),
        })
    }
}

#[async_trait]
impl Subsystem for Reporter {
    fn name(&self) -> &str {
        "reporter"
    }

    fn status_cell(&self) -> &StatusCell {
        &self.cell
    }

    async fn setup(&self) -> Status {
        println!("📰 reporter: allocating buffers");
        self.set_status(Status::Ready).await;
        self.status().await
    }

    async fn start(&self) -> Status {
        self.worker.spawn(&self.cell).await
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (tx, rx) = mpsc::channel(16);
    let store = Store::arc();
    let sampler = Sampler::arc(tx);
    let reporter = Reporter::arc(rx);

    let mut orchestrator = Orchestrator::new();
    orchestrator.register(SubsystemSpec::new(store.clone()));
    orchestrator.register(SubsystemSpec::new(sampler.clone()));
    orchestrator.register(
        SubsystemSpec::new(reporter.clone())
            .depends_on(store.clone())
            .depends_on(sampler.clone()),
    );

    println!("== setup ==");
    orchestrator.setup().await?;
    println!(
        "statuses: store={} sampler={} reporter={}",
        store.status().await,
        sampler.status().await,
        reporter.status().await,
    );

    println!("== start ==");
    orchestrator.start().await?;
    println!(
        "statuses: store={} sampler={} reporter={}",
        store.status().await,
        sampler.status().await,
        reporter.status().await,
    );

    // Drive the tickable subsystem the way an external timer loop would,
    // while the workers run in the background.
    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        store.tick().await;
    }

    Ok(())
}
