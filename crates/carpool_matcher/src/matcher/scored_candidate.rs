use serde::Serialize;

use crate::matcher::candidate_selector::CandidateNode;

/// A candidate node refined with road distances and durations from both
/// participants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub node: CandidateNode,
    pub companion_distance_km: f64,
    pub companion_minutes: u32,
    pub driver_distance_km: f64,
    pub driver_minutes: u32,
}

impl ScoredCandidate {
    /// The driver may reach the node up to `buffer_minutes` ahead of the
    /// companion, but the companion must not need longer than that.
    pub fn is_punctual(&self, buffer_minutes: u32) -> bool {
        self.driver_minutes.saturating_add(buffer_minutes) >= self.companion_minutes
    }
}
