//! Cluster client subsystem.
//!
//! # Data Flow
//! ```text
//! ProbeConfig
//!     → builder.rs (ConnectionSettings, endpoint binding, fail-fast)
//!     → cluster.rs (ClusterClient: GET /_cluster/health over TLS)
//!     → types.rs (ClusterHealth, HealthStatus, ProbeError)
//! ```
//!
//! # Design Decisions
//! - The poller depends on the `HealthSource` trait, not on the HTTP client
//! - Error taxonomy is an enum so callers can match on the cause

use std::future::Future;

pub mod builder;
pub mod cluster;
pub mod types;

pub use builder::{ConnectionBuilder, ConnectionSettings};
pub use cluster::ClusterClient;
pub use types::{ClusterHealth, Credentials, HealthStatus, ProbeError, ProbeResult};

/// Anything that can report cluster health.
pub trait HealthSource {
    fn cluster_health(&self) -> impl Future<Output = ProbeResult<ClusterHealth>> + Send;
}
