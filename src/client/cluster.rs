//! Cluster client handle.

use url::Url;
use uuid::Uuid;

use crate::client::builder::ConnectionSettings;
use crate::client::types::{ClusterHealth, ProbeError, ProbeResult};
use crate::client::HealthSource;
use crate::net::Endpoint;

/// Header used by the coordinator to tag slow logs and tasks with a caller id.
const OPAQUE_ID_HEADER: &str = "x-opaque-id";

/// Live handle to the cluster coordinator.
///
/// Owned exclusively by the health poller; nothing mutates it after construction.
#[derive(Clone)]
pub struct ClusterClient {
    http: reqwest::Client,
    health_url: Url,
    settings: ConnectionSettings,
    endpoints: Vec<Endpoint>,
}

impl ClusterClient {
    pub(crate) fn new(
        http: reqwest::Client,
        health_url: Url,
        settings: ConnectionSettings,
        endpoints: Vec<Endpoint>,
    ) -> Self {
        Self {
            http,
            health_url,
            settings,
            endpoints,
        }
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// Issue one cluster health request. No timeout is applied here; callers bound the wait.
    pub async fn fetch_health(&self) -> ProbeResult<ClusterHealth> {
        let request_id = Uuid::new_v4();

        let mut request = self
            .http
            .get(self.health_url.clone())
            .header(OPAQUE_ID_HEADER, request_id.to_string());

        if let Some(creds) = &self.settings.credentials {
            request = request.basic_auth(&creds.username, creds.password.as_deref());
        }

        tracing::trace!(request_id = %request_id, url = %self.health_url, "Sending health request");

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let health = response.json::<ClusterHealth>().await?;
        Ok(health)
    }
}

impl HealthSource for ClusterClient {
    async fn cluster_health(&self) -> ProbeResult<ClusterHealth> {
        self.fetch_health().await
    }
}

impl std::fmt::Debug for ClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterClient")
            .field("cluster", &self.settings.cluster_name)
            .field("url", &self.health_url.as_str())
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
