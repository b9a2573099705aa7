//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required inputs present (host)
//! - Validate value ranges (timeouts > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ProbeConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("connection.host is required")]
    MissingHost,

    #[error("connection.port must be non-zero")]
    InvalidPort,

    #[error("at least one of resolve.ip4 or resolve.ip6 must be enabled")]
    NoAddressFamily,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("poll.max_polls must be greater than zero when set")]
    ZeroMaxPolls,

    #[error("poll.backoff.base_delay_ms ({base}) exceeds max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("invalid observability.metrics_address '{0}'")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.connection.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.connection.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if !config.resolve.ip4 && !config.resolve.ip6 {
        errors.push(ValidationError::NoAddressFamily);
    }
    if config.connection.keep_alive_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "connection.keep_alive_secs" });
    }
    if config.resolve.timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration { field: "resolve.timeout_ms" });
    }
    if config.poll.interval_ms == 0 {
        errors.push(ValidationError::ZeroDuration { field: "poll.interval_ms" });
    }
    if config.poll.timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration { field: "poll.timeout_ms" });
    }
    if config.poll.max_polls == Some(0) {
        errors.push(ValidationError::ZeroMaxPolls);
    }

    let backoff = &config.poll.backoff;
    if backoff.enabled && backoff.base_delay_ms > backoff.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: backoff.base_delay_ms,
            max: backoff.max_delay_ms,
        });
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
