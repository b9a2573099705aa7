//! Cluster health types and error definitions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while setting up or polling the cluster.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The hostname could not be resolved.
    #[error("Unable to resolve host '{host}': {source}")]
    Resolution {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Resolution produced no address of an enabled family.
    #[error("No usable addresses for host '{0}'")]
    NoAddresses(String),

    /// Connecting or completing the TLS handshake failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// No response within the bounded wait.
    #[error("No health response within {0:?}")]
    Timeout(Duration),

    /// Request failed after the connection was established.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The coordinator answered with a non-success status code.
    #[error("Cluster returned HTTP {0}")]
    Status(u16),

    /// The health response could not be decoded.
    #[error("Invalid health response: {0}")]
    Decode(String),
}

impl ProbeError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Config(_) => "config",
            ProbeError::Resolution { .. } => "resolution",
            ProbeError::NoAddresses(_) => "no_addresses",
            ProbeError::Connection(_) => "connection",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Transport(_) => "transport",
            ProbeError::Status(_) => "status",
            ProbeError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ProbeError::Connection(err.to_string())
        } else if err.is_decode() {
            ProbeError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProbeError::Status(status.as_u16())
        } else {
            ProbeError::Transport(err.to_string())
        }
    }
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Cluster health classification reported by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
}

impl HealthStatus {
    /// Numeric gauge value (2=green, 1=yellow, 0=red).
    pub fn as_gauge(&self) -> f64 {
        match self {
            HealthStatus::Green => 2.0,
            HealthStatus::Yellow => 1.0,
            HealthStatus::Red => 0.0,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Green => "GREEN",
            HealthStatus::Yellow => "YELLOW",
            HealthStatus::Red => "RED",
        };
        f.write_str(s)
    }
}

/// Subset of the coordinator's cluster health response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterHealth {
    pub cluster_name: String,
    pub status: HealthStatus,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub number_of_nodes: u32,
    #[serde(default)]
    pub number_of_data_nodes: u32,
    #[serde(default)]
    pub active_shards: u32,
    #[serde(default)]
    pub relocating_shards: u32,
    #[serde(default)]
    pub initializing_shards: u32,
    #[serde(default)]
    pub unassigned_shards: u32,
}

/// Credential identity forwarded to the remote authentication layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl Credentials {
    /// Parse `user` or `user:password`.
    pub fn parse(value: &str) -> ProbeResult<Self> {
        let (username, password) = match value.split_once(':') {
            Some((user, pass)) => (user, Some(pass.to_string())),
            None => (value, None),
        };
        if username.is_empty() {
            return Err(ProbeError::Config("credential user name is empty".to_string()));
        }
        Ok(Self {
            username: username.to_string(),
            password,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
