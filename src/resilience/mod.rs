//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Health poll:
//!     → bounded wait (tokio timeout in health::poller)
//!     → On failure: backoff.rs (optionally stretch the next pause)
//! ```
//!
//! # Design Decisions
//! - Every health request has a deadline
//! - Backoff is opt-in; the default cadence stays fixed
//! - Jittered backoff prevents many probes re-polling in lockstep

pub mod backoff;
