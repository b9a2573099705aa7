//! Cluster Health Probe (v1)
//!
//! Polls the health of a hosted search cluster over an encrypted channel.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────┐    ┌────────────┐    ┌──────────────────┐    ┌──────────────┐
//!   │   config   │───▶│    net     │───▶│      client      │───▶│    health    │
//!   │ file+flags │    │  resolver  │    │ builder (TLS,    │    │    poller    │
//!   │ validation │    │ ip4 / ip6  │    │ auth, endpoints) │    │ (loop, 1s)   │
//!   └────────────┘    └────────────┘    └──────────────────┘    └──────┬───────┘
//!                                                                      │
//!   ┌─────────────────────────────────────────────────────────┐        │
//!   │ lifecycle (signals → shutdown)  observability (logs,    │◀───────┘
//!   │ resilience (backoff)            metrics)                │
//!   └─────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use cluster_health_probe::config::{load_config, CliArgs};
use cluster_health_probe::health::HealthPoller;
use cluster_health_probe::lifecycle::{signals, startup, Shutdown};
use cluster_health_probe::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("cluster-health-probe v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown.clone());

    let client = match startup::connect_until_shutdown(&config, &mut signal).await {
        Ok(Some(client)) => client,
        Ok(None) => {
            tracing::info!("Shutdown complete");
            return Ok(());
        }
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let poller = HealthPoller::new(client, config.poll.clone());
    let stats = poller.run(signal).await;

    tracing::info!(
        polls = stats.polls,
        successes = stats.successes,
        failures = stats.failures,
        timeouts = stats.timeouts,
        "Shutdown complete"
    );
    Ok(())
}
