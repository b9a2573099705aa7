//! Cluster Health Probe Library

pub mod client;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use client::{ClusterClient, ConnectionBuilder, ProbeError};
pub use config::schema::ProbeConfig;
pub use health::poller::HealthPoller;
pub use lifecycle::Shutdown;
