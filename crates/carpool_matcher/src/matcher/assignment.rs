use carpool_providers::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

use crate::{matcher::scored_candidate::ScoredCandidate, problem::pair_id::PairId};

/// The meeting point chosen for one driver and one companion.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Assignment {
    pub pair: PairId,
    pub meeting_point: Coordinate,
    pub road_distance_km: f64,
    pub companion_minutes: u32,
    pub driver_minutes: u32,
}

/// Outcome of refining the candidates of one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairResolution {
    pub pair: PairId,
    pub best: Option<ScoredCandidate>,
    pub evaluated: usize,
    /// Scored, but farther than the best so far or not punctual
    pub rejected: usize,
    /// Routing or parsing failed
    pub failed: usize,
}

impl PairResolution {
    pub fn unresolved(pair: PairId) -> Self {
        Self {
            pair,
            best: None,
            evaluated: 0,
            rejected: 0,
            failed: 0,
        }
    }

    /// Companion road distance to the best node, infinite when none qualified.
    pub fn road_distance_km(&self) -> f64 {
        self.best
            .as_ref()
            .map_or(f64::INFINITY, |best| best.companion_distance_km)
    }

    pub fn is_feasible(&self) -> bool {
        self.best.is_some()
    }

    pub fn to_assignment(&self) -> Option<Assignment> {
        self.best.as_ref().map(|best| Assignment {
            pair: self.pair.clone(),
            meeting_point: best.node.coordinate,
            road_distance_km: best.companion_distance_km,
            companion_minutes: best.companion_minutes,
            driver_minutes: best.driver_minutes,
        })
    }
}
