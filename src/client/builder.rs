//! Connection configuration and client construction.
//!
//! # Responsibilities
//! - Turn validated configuration into immutable connection settings
//! - Bind the client to the resolved endpoints
//! - Refuse to build a client with no route to the cluster
//!
//! # Design Decisions
//! - Lazy connect: sockets and the TLS handshake happen on the first request
//! - The hostname is pinned to the resolved endpoints, so the HTTP client
//!   never re-resolves with different family rules
//! - TLS is delegated to the HTTP client's TLS stack

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::client::cluster::ClusterClient;
use crate::client::types::{Credentials, ProbeError, ProbeResult};
use crate::config::ProbeConfig;
use crate::net::Endpoint;

/// Header carrying the logical cluster name on every request.
pub const CLUSTER_HEADER: &str = "x-found-cluster";

/// Immutable connection configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Hostname the endpoints were resolved from (also used for TLS SNI).
    pub host: String,
    /// Logical cluster name.
    pub cluster_name: String,
    /// Require an encrypted transport.
    pub ssl: bool,
    /// Credentials forwarded to the remote authentication layer.
    pub credentials: Option<Credentials>,
    /// TCP keep-alive interval.
    pub keep_alive: Duration,
    /// Accept compressed responses.
    pub compress: bool,
}

impl ConnectionSettings {
    pub fn from_config(config: &ProbeConfig) -> ProbeResult<Self> {
        let host = config.connection.host.trim().to_string();
        if host.is_empty() {
            return Err(ProbeError::Config("connection.host is required".to_string()));
        }

        let credentials = config
            .connection
            .shield_user
            .as_deref()
            .map(Credentials::parse)
            .transpose()?;

        Ok(Self {
            host,
            cluster_name: config.cluster_name(),
            ssl: config.connection.ssl,
            credentials,
            keep_alive: Duration::from_secs(config.connection.keep_alive_secs),
            compress: config.connection.compress,
        })
    }

    pub fn scheme(&self) -> &'static str {
        if self.ssl {
            "https"
        } else {
            "http"
        }
    }
}

/// Builder for a [`ClusterClient`] bound to a set of endpoints.
#[derive(Debug)]
pub struct ConnectionBuilder {
    settings: ConnectionSettings,
    port: u16,
    endpoints: Vec<Endpoint>,
}

impl ConnectionBuilder {
    pub fn new(settings: ConnectionSettings, port: u16) -> Self {
        Self {
            settings,
            port,
            endpoints: Vec::new(),
        }
    }

    /// Add one resolved address; the configured port is attached to it.
    pub fn address(mut self, ip: IpAddr) -> Self {
        let endpoint = Endpoint::new(ip, self.port);
        if !self.endpoints.contains(&endpoint) {
            self.endpoints.push(endpoint);
        }
        self
    }

    pub fn addresses<I>(self, ips: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        ips.into_iter().fold(self, |builder, ip| builder.address(ip))
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Build the client. Fails fast when no endpoint was added.
    pub fn build(self) -> ProbeResult<ClusterClient> {
        if self.endpoints.is_empty() {
            return Err(ProbeError::NoAddresses(self.settings.host.clone()));
        }

        let health_url = health_url(&self.settings, self.port)?;

        let mut headers = HeaderMap::new();
        let cluster = HeaderValue::from_str(&self.settings.cluster_name).map_err(|e| {
            ProbeError::Config(format!("invalid cluster name '{}': {}", self.settings.cluster_name, e))
        })?;
        headers.insert(HeaderName::from_static(CLUSTER_HEADER), cluster);

        let mut http = reqwest::Client::builder()
            .user_agent(concat!("cluster-health-probe/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .tcp_keepalive(self.settings.keep_alive)
            .gzip(self.settings.compress)
            .no_proxy();

        if self.settings.ssl {
            http = http.https_only(true);
        }

        // Literal IPs need no pinning; names are pinned to the filtered endpoints.
        if self.settings.host.parse::<IpAddr>().is_err() {
            let addrs: Vec<SocketAddr> = self.endpoints.iter().map(Endpoint::socket_addr).collect();
            http = http.resolve_to_addrs(&self.settings.host, &addrs);
        }

        let http = http
            .build()
            .map_err(|e| ProbeError::Connection(format!("failed to initialise HTTP client: {}", e)))?;

        tracing::debug!(
            cluster = %self.settings.cluster_name,
            url = %health_url,
            endpoints = self.endpoints.len(),
            "Cluster client built"
        );

        Ok(ClusterClient::new(http, health_url, self.settings, self.endpoints))
    }
}

fn health_url(settings: &ConnectionSettings, port: u16) -> ProbeResult<Url> {
    let host = match settings.host.parse::<IpAddr>() {
        Ok(IpAddr::V6(ip)) => format!("[{}]", ip),
        _ => settings.host.clone(),
    };
    let base = format!("{}://{}:{}/", settings.scheme(), host, port);
    Url::parse(&base)
        .and_then(|url| url.join("_cluster/health"))
        .map_err(|e| ProbeError::Config(format!("invalid cluster URL '{}': {}", base, e)))
}
