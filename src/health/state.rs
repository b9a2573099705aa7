//! Cluster health transition tracking.
//!
//! # States
//! - Unknown: nothing observed yet
//! - Reporting(status): last poll returned a status
//! - Failing: last poll failed
//!
//! # Design Decisions
//! - Only the last observation is retained; per-poll results are not stored
//! - The first observation is not a transition

use crate::client::{ClusterHealth, HealthStatus, ProbeResult};

/// What the last poll told us about the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Reporting(HealthStatus),
    Failing,
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Observation::Reporting(status) => write!(f, "{}", status),
            Observation::Failing => f.write_str("FAILING"),
        }
    }
}

/// A change between two consecutive observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Observation,
    pub to: Observation,
}

impl Transition {
    /// True when the cluster got worse (or stopped answering).
    pub fn is_degradation(&self) -> bool {
        rank(self.to) < rank(self.from)
    }
}

fn rank(observation: Observation) -> u8 {
    match observation {
        Observation::Failing => 0,
        Observation::Reporting(HealthStatus::Red) => 1,
        Observation::Reporting(HealthStatus::Yellow) => 2,
        Observation::Reporting(HealthStatus::Green) => 3,
    }
}

/// Remembers the last observation and reports changes.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<Observation>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Observation> {
        self.last
    }

    /// Record a poll outcome, returning the transition if the observation changed.
    pub fn observe(&mut self, outcome: &ProbeResult<ClusterHealth>) -> Option<Transition> {
        let current = match outcome {
            Ok(health) => Observation::Reporting(health.status),
            Err(_) => Observation::Failing,
        };

        let previous = self.last.replace(current)?;
        if previous == current {
            return None;
        }
        Some(Transition { from: previous, to: current })
    }
}
