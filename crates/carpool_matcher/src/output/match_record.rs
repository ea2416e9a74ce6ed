use std::collections::BTreeMap;

use carpool_providers::{coordinate::Coordinate, location::Location};
use jiff::{Timestamp, Zoned, civil::DateTime};
use serde::{Deserialize, Serialize};

use crate::{
    matcher::match_result::{Degradation, MatchResult},
    problem::{companion::Companion, driver::Driver},
};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordLocations {
    pub drivers: Vec<Driver>,
    pub companions: Vec<Companion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordIntersection {
    pub driver_id: String,
    pub companion_id: String,
    pub intersection_point: Coordinate,
    pub road_distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordPath {
    pub path: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration: String,
}

/// The stored form of a [`MatchResult`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatchRecord {
    pub timestamp: Timestamp,
    pub created_at: DateTime,
    pub office: Location,
    pub locations: RecordLocations,
    /// Keyed by `{driver}_{companion}`
    pub best_intersection: BTreeMap<String, RecordIntersection>,
    /// Keyed by driver id
    pub driver_paths: BTreeMap<String, RecordPath>,
    #[serde(default)]
    pub degradations: Vec<Degradation>,
}

impl MatchRecord {
    pub fn new(result: &MatchResult, timestamp: Timestamp, created_at: DateTime) -> Self {
        let best_intersection = result
            .assignments
            .iter()
            .map(|assignment| {
                (
                    assignment.pair.to_string(),
                    RecordIntersection {
                        driver_id: assignment.pair.driver_id.clone(),
                        companion_id: assignment.pair.companion_id.clone(),
                        intersection_point: assignment.meeting_point,
                        road_distance_km: assignment.road_distance_km,
                    },
                )
            })
            .collect();

        let driver_paths = result
            .driver_routes
            .iter()
            .map(|driver_route| {
                (
                    driver_route.driver_id.clone(),
                    RecordPath {
                        path: driver_route.route.path.clone(),
                        distance_km: driver_route.route.distance_km,
                        duration: driver_route.route.duration.clone(),
                    },
                )
            })
            .collect();

        Self {
            timestamp,
            created_at,
            office: result.office.clone(),
            locations: RecordLocations {
                drivers: result.drivers.clone(),
                companions: result.companions.clone(),
            },
            best_intersection,
            driver_paths,
            degradations: result.degradations.clone(),
        }
    }

    /// Stamps the record with the current time.
    pub fn now(result: &MatchResult) -> Self {
        let now = Zoned::now();
        Self::new(result, now.timestamp(), now.datetime())
    }
}
