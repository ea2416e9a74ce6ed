use carpool_providers::{
    location::Location,
    routing_service::{RoutingService, TravelMode},
};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::matcher::{
    assignment::{Assignment, PairResolution},
    candidate_selector::{CandidateNode, PairCandidates},
    match_error::{CandidateError, Leg},
    matcher_params::MatcherParams,
    scored_candidate::ScoredCandidate,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// All pairs, ascending by resolved road distance.
    pub ranked_pairs: Vec<PairResolution>,
    /// `None` when no pair has a feasible meeting point.
    pub assignment: Option<Assignment>,
}

/// Refines aerial candidates with road distances and picks the meeting point.
pub struct IntersectionResolver<'a, R> {
    routing: &'a R,
    travel_mode: TravelMode,
    max_concurrent_pairs: usize,
}

impl<'a, R: RoutingService> IntersectionResolver<'a, R> {
    pub fn new(routing: &'a R, params: &MatcherParams) -> Self {
        Self {
            routing,
            travel_mode: params.travel_mode,
            max_concurrent_pairs: params.max_concurrent_pairs.max(1),
        }
    }

    /// Resolves the best candidate of every pair, then selects the single
    /// pair with the smallest companion road distance across the whole run.
    ///
    /// Road legs are measured from the positions carried by each
    /// [`PairCandidates`], never looked up again by id. Pairs are refined
    /// concurrently but collected in input order, and ties are broken by pair
    /// id, so the outcome only depends on the distances.
    pub async fn resolve_best(
        &self,
        candidates_by_pair: &[PairCandidates],
        buffer_minutes: u32,
    ) -> Resolution {
        let mut ranked_pairs: Vec<PairResolution> = futures::stream::iter(candidates_by_pair)
            .map(|pair_candidates| self.resolve_pair(pair_candidates, buffer_minutes))
            .buffered(self.max_concurrent_pairs)
            .collect()
            .await;

        ranked_pairs.sort_by(|a, b| {
            a.road_distance_km()
                .total_cmp(&b.road_distance_km())
                .then_with(|| a.pair.cmp(&b.pair))
        });

        let assignment = ranked_pairs.first().and_then(PairResolution::to_assignment);

        match &assignment {
            Some(assignment) => info!(
                driver_id = %assignment.pair.driver_id,
                companion_id = %assignment.pair.companion_id,
                meeting_point = %assignment.meeting_point,
                road_distance_km = assignment.road_distance_km,
                "Best intersection found"
            ),
            None => warn!(
                pairs = ranked_pairs.len(),
                "No pair has a feasible meeting point"
            ),
        }

        Resolution {
            ranked_pairs,
            assignment,
        }
    }

    async fn resolve_pair(
        &self,
        pair_candidates: &PairCandidates,
        buffer_minutes: u32,
    ) -> PairResolution {
        let pair = &pair_candidates.pair;
        let mut resolution = PairResolution::unresolved(pair.clone());

        let driver_origin = Location::from(pair_candidates.driver_origin);
        let companion = Location::from(pair_candidates.companion);

        for node in &pair_candidates.candidates {
            resolution.evaluated += 1;

            match self.score_candidate(&companion, &driver_origin, node).await {
                Ok(scored) => {
                    if scored.companion_distance_km < resolution.road_distance_km()
                        && scored.is_punctual(buffer_minutes)
                    {
                        debug!(
                            driver_id = %pair.driver_id,
                            companion_id = %pair.companion_id,
                            route_index = node.route_index,
                            road_distance_km = scored.companion_distance_km,
                            "New best candidate"
                        );
                        resolution.best = Some(scored);
                    } else {
                        resolution.rejected += 1;
                    }
                }
                Err(err) => {
                    warn!(
                        driver_id = %pair.driver_id,
                        companion_id = %pair.companion_id,
                        route_index = node.route_index,
                        error = %err,
                        "Skipping candidate"
                    );
                    resolution.failed += 1;
                }
            }
        }

        resolution
    }

    async fn score_candidate(
        &self,
        companion: &Location,
        driver_origin: &Location,
        node: &CandidateNode,
    ) -> Result<ScoredCandidate, CandidateError> {
        let meeting_point = Location::from(node.coordinate);

        let companion_leg = self
            .routing
            .distance_duration(companion, &meeting_point, self.travel_mode)
            .await
            .map_err(|source| CandidateError::DistanceDuration {
                leg: Leg::Companion,
                source,
            })?;
        let driver_leg = self
            .routing
            .distance_duration(driver_origin, &meeting_point, self.travel_mode)
            .await
            .map_err(|source| CandidateError::DistanceDuration {
                leg: Leg::Driver,
                source,
            })?;

        let companion_minutes =
            companion_leg
                .duration_minutes()
                .map_err(|source| CandidateError::Parse {
                    leg: Leg::Companion,
                    source,
                })?;
        let driver_minutes = driver_leg
            .duration_minutes()
            .map_err(|source| CandidateError::Parse {
                leg: Leg::Driver,
                source,
            })?;

        Ok(ScoredCandidate {
            node: node.clone(),
            companion_distance_km: companion_leg.distance_km,
            companion_minutes,
            driver_distance_km: driver_leg.distance_km,
            driver_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use carpool_providers::coordinate::Coordinate;

    use super::*;
    use crate::{
        matcher::{
            candidate_selector::select_all_candidates,
            match_result::{DriverRoute, ResolvedCompanion},
        },
        test_utils::{StubRoutingService, coordinate_north_of, route_through},
    };

    const BUFFER_MINUTES: u32 = 5;

    struct Fixture {
        candidates: Vec<PairCandidates>,
    }

    fn fixture(driver_routes: Vec<DriverRoute>, companions: Vec<ResolvedCompanion>) -> Fixture {
        Fixture {
            candidates: select_all_candidates(&driver_routes, &companions, 5),
        }
    }

    async fn resolve(
        routing: &StubRoutingService,
        fixture: &Fixture,
        params: &MatcherParams,
    ) -> Resolution {
        IntersectionResolver::new(routing, params)
            .resolve_best(&fixture.candidates, BUFFER_MINUTES)
            .await
    }

    #[tokio::test]
    async fn test_timing_filter_beats_shorter_distance() {
        let companion = Coordinate::new(12.9716, 77.5946);
        let origin = coordinate_north_of(&companion, 20.0);
        let near = coordinate_north_of(&companion, 1.0);
        let far = coordinate_north_of(&companion, 3.0);

        // `near` is closer by road, but the companion needs 30 minutes while
        // the driver is there after 5
        let routing = StubRoutingService::new()
            .with_leg(companion, near, 1.2, "30 mins")
            .with_leg(origin, near, 19.0, "5 mins")
            .with_leg(companion, far, 3.4, "10 mins")
            .with_leg(origin, far, 17.0, "8 mins");

        let fixture = fixture(
            vec![DriverRoute::new("d1", route_through(vec![origin, far, near]))],
            vec![ResolvedCompanion::new("c1", companion)],
        );

        let resolution = resolve(&routing, &fixture, &MatcherParams::default()).await;
        let assignment = resolution.assignment.unwrap();

        assert_eq!(assignment.meeting_point, far);
        assert_eq!(assignment.road_distance_km, 3.4);
        assert_eq!(resolution.ranked_pairs[0].rejected, 1);
        // No leg is known from the companion to the driver's own origin
        assert_eq!(resolution.ranked_pairs[0].failed, 1);
    }

    #[tokio::test]
    async fn test_failed_candidates_are_skipped() {
        let companion = Coordinate::new(12.9716, 77.5946);
        let origin = coordinate_north_of(&companion, 10.0);
        let unparseable = coordinate_north_of(&companion, 1.0);
        let missing = coordinate_north_of(&companion, 2.0);
        let good = coordinate_north_of(&companion, 4.0);

        let routing = StubRoutingService::new()
            .with_leg(companion, unparseable, 1.0, "Unknown")
            .with_leg(origin, unparseable, 9.0, "12 mins")
            .with_leg(origin, missing, 8.0, "11 mins")
            .with_leg(companion, good, 4.5, "9 mins")
            .with_leg(origin, good, 6.0, "7 mins");

        let fixture = fixture(
            vec![DriverRoute::new(
                "d1",
                route_through(vec![origin, good, missing, unparseable]),
            )],
            vec![ResolvedCompanion::new("c1", companion)],
        );

        let resolution = resolve(&routing, &fixture, &MatcherParams::default()).await;
        let pair = &resolution.ranked_pairs[0];

        assert_eq!(pair.evaluated, 4);
        assert_eq!(pair.failed, 3);
        assert_eq!(pair.best.as_ref().unwrap().node.coordinate, good);
    }

    #[tokio::test]
    async fn test_no_feasible_pair() {
        let companion = Coordinate::new(12.9716, 77.5946);
        let origin = coordinate_north_of(&companion, 10.0);
        let node = coordinate_north_of(&companion, 1.0);

        let routing = StubRoutingService::new()
            .with_leg(companion, node, 1.0, "40 mins")
            .with_leg(origin, node, 9.0, "12 mins")
            .with_leg(companion, origin, 10.0, "60 mins")
            .with_leg(origin, origin, 0.0, "0 mins");

        let fixture = fixture(
            vec![DriverRoute::new("d1", route_through(vec![origin, node]))],
            vec![ResolvedCompanion::new("c1", companion)],
        );

        let resolution = resolve(&routing, &fixture, &MatcherParams::default()).await;

        assert!(resolution.assignment.is_none());
        assert_eq!(resolution.ranked_pairs.len(), 1);
        assert_eq!(resolution.ranked_pairs[0].road_distance_km(), f64::INFINITY);
    }

    fn two_by_two() -> (StubRoutingService, Fixture) {
        let c1 = Coordinate::new(12.90, 77.60);
        let c2 = Coordinate::new(12.80, 77.60);
        let d1 = Coordinate::new(12.95, 77.60);
        let d2 = Coordinate::new(12.85, 77.60);

        let routing = StubRoutingService::new()
            .with_leg(c1, d1, 5.6, "4 mins")
            .with_leg(d1, d1, 0.0, "0 mins")
            .with_leg(c2, d1, 16.7, "35 mins")
            .with_leg(c1, d2, 5.6, "5 mins")
            .with_leg(d2, d2, 0.0, "0 mins")
            .with_leg(c2, d2, 2.1, "4 mins");

        let fixture = fixture(
            vec![
                DriverRoute::new("d1", route_through(vec![d1])),
                DriverRoute::new("d2", route_through(vec![d2])),
            ],
            vec![
                ResolvedCompanion::new("c1", c1),
                ResolvedCompanion::new("c2", c2),
            ],
        );

        (routing, fixture)
    }

    #[tokio::test]
    async fn test_only_single_global_pair_is_assigned_known_limitation() {
        let (routing, fixture) = two_by_two();

        let resolution = resolve(&routing, &fixture, &MatcherParams::default()).await;

        // d1/c1 is feasible too, but a run only ever arranges one ride
        let assignment = resolution.assignment.unwrap();
        assert_eq!(assignment.pair.to_string(), "d2_c2");
        assert_eq!(assignment.road_distance_km, 2.1);

        let feasible: Vec<String> = resolution
            .ranked_pairs
            .iter()
            .filter(|pair| pair.is_feasible())
            .map(|pair| pair.pair.to_string())
            .collect();
        assert_eq!(feasible, vec!["d2_c2", "d1_c1", "d2_c1"]);
    }

    #[tokio::test]
    async fn test_resolution_is_deterministic() {
        let (routing, fixture) = two_by_two();

        let sequential = MatcherParams {
            max_concurrent_pairs: 1,
            ..MatcherParams::default()
        };
        let concurrent = MatcherParams {
            max_concurrent_pairs: 8,
            ..MatcherParams::default()
        };

        let first = resolve(&routing, &fixture, &concurrent).await;
        let second = resolve(&routing, &fixture, &concurrent).await;
        let third = resolve(&routing, &fixture, &sequential).await;

        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[tokio::test]
    async fn test_equal_distances_break_ties_by_pair_id() {
        let (routing, fixture) = two_by_two();

        let resolution = resolve(&routing, &fixture, &MatcherParams::default()).await;

        // d1_c1 and d2_c1 both resolve to 5.6 km
        let order: Vec<String> = resolution
            .ranked_pairs
            .iter()
            .map(|pair| pair.pair.to_string())
            .collect();
        assert_eq!(order[1], "d1_c1");
        assert_eq!(order[2], "d2_c1");
    }

    #[tokio::test]
    async fn test_shared_companion_id_keeps_each_position() {
        let a = Coordinate::new(12.90, 77.60);
        let b = Coordinate::new(13.50, 77.60);
        let origin = coordinate_north_of(&a, 20.0);
        let node = coordinate_north_of(&a, 1.0);

        let routing = StubRoutingService::new()
            .with_leg(a, node, 1.1, "5 mins")
            .with_leg(origin, node, 19.0, "20 mins");

        let fixture = fixture(
            vec![DriverRoute::new("d1", route_through(vec![origin, node]))],
            vec![ResolvedCompanion::new("c1", a), ResolvedCompanion::new("c1", b)],
        );

        let resolution = resolve(&routing, &fixture, &MatcherParams::default()).await;

        let queried_from = |from: Coordinate| {
            routing
                .calls()
                .iter()
                .filter(|call| call.starts_with(&format!("distance_duration {from} ")))
                .count()
        };
        assert_eq!(queried_from(a), 2);
        assert_eq!(queried_from(b), 2);

        let assignment = resolution.assignment.unwrap();
        assert_eq!(assignment.meeting_point, node);
        assert_eq!(assignment.road_distance_km, 1.1);
    }
}
