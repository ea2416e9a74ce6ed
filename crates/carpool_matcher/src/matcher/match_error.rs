use std::fmt::Display;

use carpool_providers::{duration_text::DurationParseError, routing_service::RoutingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("routing service connectivity check failed")]
    Connectivity,

    #[error("no feasible assignment among {pairs} driver-companion pairs")]
    NoFeasibleAssignment { pairs: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Companion,
    Driver,
}

impl Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leg::Companion => write!(f, "companion"),
            Leg::Driver => write!(f, "driver"),
        }
    }
}

/// Why a single candidate node could not be scored.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("{leg} distance/duration request failed: {source}")]
    DistanceDuration {
        leg: Leg,
        #[source]
        source: RoutingError,
    },

    #[error("{leg} duration could not be parsed: {source}")]
    Parse {
        leg: Leg,
        #[source]
        source: DurationParseError,
    },
}
