use serde::{Deserialize, Serialize};

use crate::{
    coordinate::Coordinate,
    duration_text::{DurationParseError, parse_duration_minutes},
};

/// A decoded route path with its aggregate road distance and duration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Route {
    pub path: Vec<Coordinate>,
    pub distance_km: f64,
    /// Duration as reported by the provider, e.g. `"24 mins"`.
    pub duration: String,
}

impl Route {
    pub fn origin(&self) -> Option<Coordinate> {
        self.path.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn duration_minutes(&self) -> Result<u32, DurationParseError> {
        parse_duration_minutes(&self.duration)
    }
}

/// Road distance and duration of a single point-to-point query.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoadLeg {
    pub distance_km: f64,
    pub duration: String,
}

impl RoadLeg {
    pub fn new(distance_km: f64, duration: impl Into<String>) -> Self {
        Self {
            distance_km,
            duration: duration.into(),
        }
    }

    pub fn duration_minutes(&self) -> Result<u32, DurationParseError> {
        parse_duration_minutes(&self.duration)
    }
}
