use carpool_providers::routing_service::TravelMode;

#[derive(Clone, Debug)]
pub struct MatcherParams {
    /// Route nodes kept per (driver, companion) pair after the aerial ranking.
    pub candidate_count: usize,
    /// Minutes the driver may arrive at the meeting point before the companion.
    pub buffer_minutes: u32,
    pub travel_mode: TravelMode,
    /// Pairs refined concurrently against the routing service.
    pub max_concurrent_pairs: usize,
}

impl Default for MatcherParams {
    fn default() -> Self {
        Self {
            candidate_count: 5,
            buffer_minutes: 5,
            travel_mode: TravelMode::Driving,
            max_concurrent_pairs: 4,
        }
    }
}
