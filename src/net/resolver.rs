//! Hostname resolution with address-family filtering.
//!
//! # Responsibilities
//! - Resolve a hostname to every address it maps to
//! - Keep only the families enabled in configuration
//!
//! # Design Decisions
//! - Family preference is an immutable value passed in, not shared state
//! - Unknown hosts are an error value; the caller decides whether to abort
//! - Result order follows the system resolver
//! - Lookups are bounded; a stuck resolver never blocks startup

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::lookup_host;
use tokio::time;

use crate::client::{ProbeError, ProbeResult};
use crate::config::ResolveConfig;

/// Which address families are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFamilies {
    pub ipv4: bool,
    pub ipv6: bool,
}

impl AddressFamilies {
    pub const ALL: AddressFamilies = AddressFamilies { ipv4: true, ipv6: true };

    pub fn allows(&self, ip: &IpAddr) -> bool {
        match ip {
            IpAddr::V4(_) => self.ipv4,
            IpAddr::V6(_) => self.ipv6,
        }
    }
}

impl Default for AddressFamilies {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<&ResolveConfig> for AddressFamilies {
    fn from(config: &ResolveConfig) -> Self {
        Self {
            ipv4: config.ip4,
            ipv6: config.ip6,
        }
    }
}

/// Keep the addresses of enabled families, preserving order and dropping duplicates.
pub fn filter_families<I>(addrs: I, families: AddressFamilies) -> Vec<IpAddr>
where
    I: IntoIterator<Item = IpAddr>,
{
    let mut out: Vec<IpAddr> = Vec::new();
    for ip in addrs {
        if families.allows(&ip) && !out.contains(&ip) {
            out.push(ip);
        }
    }
    out
}

/// Resolve `host` within `deadline` and return its addresses of the enabled families.
///
/// The result may be empty when the host only has addresses of disabled families.
pub async fn resolve(
    host: &str,
    families: AddressFamilies,
    deadline: Duration,
) -> ProbeResult<Vec<IpAddr>> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ProbeError::Config("hostname must not be empty".to_string()));
    }

    // Port is irrelevant for the lookup; endpoints get theirs from configuration.
    lookup_within(host, families, deadline, lookup_host((host, 0))).await
}

async fn lookup_within<F, I>(
    host: &str,
    families: AddressFamilies,
    deadline: Duration,
    lookup: F,
) -> ProbeResult<Vec<IpAddr>>
where
    F: Future<Output = io::Result<I>>,
    I: Iterator<Item = SocketAddr>,
{
    let resolved = match time::timeout(deadline, lookup).await {
        Ok(result) => result.map_err(|source| ProbeError::Resolution {
            host: host.to_string(),
            source,
        })?,
        Err(_) => {
            return Err(ProbeError::Resolution {
                host: host.to_string(),
                source: io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("lookup did not finish within {:?}", deadline),
                ),
            })
        }
    };

    let addrs = filter_families(resolved.map(|addr| addr.ip()), families);

    tracing::debug!(
        host = %host,
        ipv4 = families.ipv4,
        ipv6 = families.ipv6,
        count = addrs.len(),
        "Resolved host"
    );

    Ok(addrs)
}
