//! Command-line and environment overrides.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::schema::ProbeConfig;

#[derive(Debug, Default, Parser)]
#[command(name = "cluster-health-probe")]
#[command(about = "Poll the health of a hosted search cluster", long_about = None)]
pub struct CliArgs {
    /// Optional TOML configuration file; flags override its values
    #[arg(short, long, env = "PROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hostname of the target cluster
    #[arg(long, env = "PROBE_HOST")]
    pub host: Option<String>,

    /// Port to connect to
    #[arg(short, long, env = "PROBE_PORT")]
    pub port: Option<u16>,

    /// Cluster name (defaults to the first label of the host)
    #[arg(long, env = "PROBE_CLUSTER")]
    pub cluster: Option<String>,

    /// Require an encrypted transport
    #[arg(long, env = "PROBE_SSL", action = ArgAction::Set)]
    pub ssl: Option<bool>,

    /// Accept IPv4 addresses during resolution
    #[arg(long, env = "PROBE_IP4", action = ArgAction::Set)]
    pub ip4: Option<bool>,

    /// Accept IPv6 addresses during resolution
    #[arg(long, env = "PROBE_IP6", action = ArgAction::Set)]
    pub ip6: Option<bool>,

    /// Credentials, `user` or `user:password`
    #[arg(long = "shield-user", env = "PROBE_SHIELD_USER")]
    pub shield_user: Option<String>,

    /// Stop after this many polls
    #[arg(long, env = "PROBE_MAX_POLLS")]
    pub max_polls: Option<u64>,

    /// Emit JSON log lines
    #[arg(long, env = "PROBE_JSON_LOGS")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Apply every flag that was given on top of `config`.
    pub fn apply(&self, config: &mut ProbeConfig) {
        if let Some(host) = &self.host {
            config.connection.host = host.clone();
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if let Some(cluster) = &self.cluster {
            config.connection.cluster = Some(cluster.clone());
        }
        if let Some(ssl) = self.ssl {
            config.connection.ssl = ssl;
        }
        if let Some(ip4) = self.ip4 {
            config.resolve.ip4 = ip4;
        }
        if let Some(ip6) = self.ip6 {
            config.resolve.ip6 = ip6;
        }
        if let Some(user) = &self.shield_user {
            config.connection.shield_user = Some(user.clone());
        }
        if let Some(max_polls) = self.max_polls {
            config.poll.max_polls = Some(max_polls);
        }
        if self.json_logs {
            config.observability.json_logs = true;
        }
    }
}
