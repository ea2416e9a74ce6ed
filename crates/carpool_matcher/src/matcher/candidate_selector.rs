use carpool_providers::{coordinate::Coordinate, route::Route};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    geo_math::try_aerial_distance,
    matcher::match_result::{DriverRoute, ResolvedCompanion},
    problem::pair_id::PairId,
};

/// A route node considered as a meeting point for one companion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateNode {
    pub coordinate: Coordinate,
    /// Position of the node in the driver's route.
    pub route_index: usize,
    pub aerial_distance_km: f64,
}

/// Candidates of one (driver, companion) pair, together with the positions
/// the road legs are measured from.
#[derive(Debug, Clone, PartialEq)]
pub struct PairCandidates {
    pub pair: PairId,
    pub driver_origin: Coordinate,
    pub companion: Coordinate,
    pub candidates: Vec<CandidateNode>,
}

/// Returns the `k` route nodes closest to `companion` as the crow flies,
/// closest first. Nodes at the same distance keep their route order and
/// nodes with an unusable distance are dropped.
pub fn select_candidates(route: &Route, companion: &Coordinate, k: usize) -> Vec<CandidateNode> {
    if !companion.is_valid() {
        return Vec::new();
    }

    let mut candidates: Vec<CandidateNode> = route
        .path
        .iter()
        .enumerate()
        .filter_map(
            |(route_index, coordinate)| match try_aerial_distance(companion, coordinate) {
                Ok(aerial_distance_km) => Some(CandidateNode {
                    coordinate: *coordinate,
                    route_index,
                    aerial_distance_km,
                }),
                Err(err) => {
                    debug!(route_index, error = %err, "Skipping unusable route node");
                    None
                }
            },
        )
        .collect();

    candidates.sort_by(|a, b| a.aerial_distance_km.total_cmp(&b.aerial_distance_km));
    candidates.truncate(k);

    candidates
}

/// Runs [`select_candidates`] for every (driver, companion) pair, drivers
/// first. Companions with an invalid coordinate and drivers whose route has
/// no origin get no pairs.
pub fn select_all_candidates(
    driver_routes: &[DriverRoute],
    companions: &[ResolvedCompanion],
    k: usize,
) -> Vec<PairCandidates> {
    let companions: Vec<&ResolvedCompanion> = companions
        .iter()
        .filter(|companion| {
            let valid = companion.coordinate.is_valid();
            if !valid {
                warn!(
                    companion_id = %companion.id,
                    coordinate = %companion.coordinate,
                    "Companion coordinate is invalid, skipping companion"
                );
            }
            valid
        })
        .collect();

    driver_routes
        .iter()
        .filter_map(|driver_route| {
            let origin = driver_route.route.origin();
            if origin.is_none() {
                warn!(driver_id = %driver_route.driver_id, "Driver route has no origin, skipping driver");
            }
            origin.map(|origin| (driver_route, origin))
        })
        .flat_map(|(driver_route, driver_origin)| {
            companions.iter().map(move |companion| PairCandidates {
                pair: PairId::new(&driver_route.driver_id, &companion.id),
                driver_origin,
                companion: companion.coordinate,
                candidates: select_candidates(&driver_route.route, &companion.coordinate, k),
            })
        })
        .collect()
}
