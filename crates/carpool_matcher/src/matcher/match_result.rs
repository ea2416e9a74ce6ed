use carpool_providers::{coordinate::Coordinate, location::Location, route::Route};
use serde::{Deserialize, Serialize};

use crate::{
    matcher::{
        assignment::{Assignment, PairResolution},
        match_error::MatchError,
    },
    problem::{companion::Companion, driver::Driver},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverRoute {
    pub driver_id: String,
    pub route: Route,
}

impl DriverRoute {
    pub fn new(driver_id: impl Into<String>, route: Route) -> Self {
        Self {
            driver_id: driver_id.into(),
            route,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCompanion {
    pub id: String,
    pub coordinate: Coordinate,
}

impl ResolvedCompanion {
    pub fn new(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            coordinate,
        }
    }
}

/// A participant left out of the run, either because the routing service
/// failed for it or because its id was already taken.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    Geocode { companion_id: String, reason: String },
    Route { driver_id: String, reason: String },
    DuplicateCompanion { companion_id: String },
    DuplicateDriver { driver_id: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub office: Location,
    pub drivers: Vec<Driver>,
    pub companions: Vec<Companion>,
    /// Holds at most one assignment: the globally best pair of the run.
    pub assignments: Vec<Assignment>,
    pub driver_routes: Vec<DriverRoute>,
    /// Every evaluated pair, best road distance first.
    pub ranked_pairs: Vec<PairResolution>,
    pub degradations: Vec<Degradation>,
}

impl MatchResult {
    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignments.first()
    }

    pub fn require_assignment(&self) -> Result<&Assignment, MatchError> {
        self.assignment().ok_or(MatchError::NoFeasibleAssignment {
            pairs: self.ranked_pairs.len(),
        })
    }
}
