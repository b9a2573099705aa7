//! Health polling subsystem.
//!
//! # Data Flow
//! ```text
//! poller.rs:
//!     Bounded health request
//!     → Log outcome, update counters and metrics
//!     → state.rs (report status transitions)
//!     → Sleep interval (or backoff), repeat until shutdown
//! ```
//!
//! # Design Decisions
//! - Every failure is non-fatal; the loop keeps polling
//! - Only the last observation is retained between polls

pub mod poller;
pub mod state;

pub use poller::{HealthPoller, PollStats};
