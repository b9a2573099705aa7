//! Startup orchestration.
//!
//! # Responsibilities
//! - Log the effective connection parameters
//! - Resolve the cluster host with the configured family filter
//! - Build the cluster client bound to the resolved endpoints
//!
//! # Design Decisions
//! - Fail fast: an unresolvable host or an empty address set is fatal
//! - No network I/O beyond DNS; the first health request connects

use std::time::Duration;

use crate::client::{ClusterClient, ConnectionBuilder, ConnectionSettings, ProbeResult};
use crate::config::ProbeConfig;
use crate::lifecycle::ShutdownSignal;
use crate::net::{resolve, AddressFamilies};

/// Resolve the configured host and build a client for it.
pub async fn connect(config: &ProbeConfig) -> ProbeResult<ClusterClient> {
    let settings = ConnectionSettings::from_config(config)?;
    let port = config.connection.port;
    let families = AddressFamilies::from(&config.resolve);

    tracing::info!(
        cluster = %settings.cluster_name,
        host = %settings.host,
        port,
        ssl = settings.ssl,
        user = settings.credentials.as_ref().map(|c| c.username.as_str()).unwrap_or("-"),
        ip4 = families.ipv4,
        ip6 = families.ipv6,
        "Connecting to cluster"
    );

    let deadline = Duration::from_millis(config.resolve.timeout_ms);
    let addrs = match resolve(&settings.host, families, deadline).await {
        Ok(addrs) => addrs,
        Err(e) => {
            tracing::error!(host = %settings.host, error = %e, "Unable to resolve host");
            return Err(e);
        }
    };

    let builder = ConnectionBuilder::new(settings, port).addresses(addrs);
    for endpoint in builder.endpoints() {
        tracing::info!(endpoint = %endpoint, "Added cluster endpoint");
    }

    builder.build()
}

/// Like [`connect`], but gives up when shutdown is requested first.
///
/// Returns `Ok(None)` when the shutdown won.
pub async fn connect_until_shutdown(
    config: &ProbeConfig,
    shutdown: &mut ShutdownSignal,
) -> ProbeResult<Option<ClusterClient>> {
    tokio::select! {
        biased;
        _ = shutdown.recv() => {
            tracing::info!("Shutdown requested during startup");
            Ok(None)
        }
        result = connect(config) => result.map(Some),
    }
}
