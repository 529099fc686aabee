//! # Bounded publish/subscribe hub
//!
//! Demonstrates `DataHub`:
//! - Callback registration with explicit capacity rejection
//! - Publishing from a worker, reading from the main task
//!
//! Run with: `cargo run --example data_hub`

use std::sync::Arc;
use std::time::Duration;

use subvisor::{DataHub, MAX_SUBSCRIBERS};

#[derive(Clone, Copy, Debug, Default)]
struct Telemetry {
    temperature_c: f32,
    pressure_kpa: f32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let hub = Arc::new(DataHub::new(Telemetry::default()));

    hub.subscribe(|t: &Telemetry| println!("🌡️  display: {:.1}°C", t.temperature_c))
        .await?;
    hub.subscribe(|t: &Telemetry| {
        if t.pressure_kpa > 103.0 {
            println!("⚠️  alarm: pressure {:.1} kPa", t.pressure_kpa);
        }
    })
    .await?;

    // The table is bounded: filling it up gets an explicit rejection,
    // not a silent drop.
    for _ in 0..MAX_SUBSCRIBERS {
        if let Err(err) = hub.subscribe(|_| {}).await {
            println!("subscription rejected: {err}");
            break;
        }
    }

    let publisher = {
        let hub = Arc::clone(&hub);
        tokio::spawn(async move {
            for step in 0..5u32 {
                hub.publish(Telemetry {
                    temperature_c: 20.0 + step as f32,
                    pressure_kpa: 101.0 + step as f32,
                })
                .await;
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        })
    };

    publisher.await?;
    let last = hub.read(|t| *t).await;
    println!("final reading: {last:?}");
    Ok(())
}
