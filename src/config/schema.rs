//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the probe.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default encrypted transport port of the hosted cluster.
pub const DEFAULT_PORT: u16 = 9343;

/// Root configuration for the health probe.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Target cluster and connection settings.
    pub connection: ConnectionConfig,

    /// Address resolution settings.
    pub resolve: ResolveConfig,

    /// Health polling loop settings.
    pub poll: PollConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProbeConfig {
    /// Cluster name to use: the explicit override, or the first label of the host.
    pub fn cluster_name(&self) -> String {
        match &self.connection.cluster {
            Some(name) if !name.is_empty() => name.clone(),
            _ => derive_cluster_name(self.connection.host.trim()),
        }
    }
}

/// Derive a cluster name from a hostname (`esprod.example.com` → `esprod`).
pub fn derive_cluster_name(host: &str) -> String {
    host.split('.').next().unwrap_or_default().to_string()
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Hostname of the target cluster (required).
    pub host: String,

    /// Port to connect to. Only the encrypted port is supported by the hosted service.
    pub port: u16,

    /// Logical cluster name. Derived from the host when absent.
    pub cluster: Option<String>,

    /// Require encryption on the transport.
    pub ssl: bool,

    /// Credential identity, `user` or `user:password`.
    #[serde(rename = "shield_user", alias = "shield.user")]
    pub shield_user: Option<String>,

    /// Keep-alive ping interval in seconds.
    pub keep_alive_secs: u64,

    /// Request response compression.
    pub compress: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            cluster: None,
            ssl: true,
            shield_user: None,
            keep_alive_secs: 5,
            compress: false,
        }
    }
}

/// Address resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Accept IPv4 addresses.
    pub ip4: bool,

    /// Accept IPv6 addresses.
    pub ip6: bool,

    /// Deadline for the hostname lookup in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            ip4: true,
            ip6: true,
            timeout_ms: 5000,
        }
    }
}

/// Health polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Pause between polls in milliseconds.
    pub interval_ms: u64,

    /// Bounded wait for a single health request in milliseconds.
    pub timeout_ms: u64,

    /// Stop after this many polls. `None` polls until shutdown.
    pub max_polls: Option<u64>,

    /// Back off after consecutive failures.
    pub backoff: BackoffConfig,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            timeout_ms: 5000,
            max_polls: None,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Backoff applied to the poll interval while the cluster keeps failing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Enable backoff. When disabled every poll waits exactly `interval_ms`.
    pub enabled: bool,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
