//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Hostname
//!     → resolver.rs (system lookup, family filter)
//!     → endpoint.rs (address + configured port)
//!     → Hand off to the connection builder
//! ```
//!
//! # Design Decisions
//! - Resolution happens once at startup
//! - An empty address set is the caller's decision, never a panic

pub mod endpoint;
pub mod resolver;

pub use endpoint::Endpoint;
pub use resolver::{filter_families, resolve, AddressFamilies};
