use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Either a free-text address or an already resolved coordinate.
///
/// Deserializes from `{ "address": "..." }` or `{ "lat": .., "lon": .. }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Location {
    Address { address: String },
    Coordinate(Coordinate),
}

impl Location {
    pub fn address(address: impl Into<String>) -> Self {
        Location::Address {
            address: address.into(),
        }
    }
}

impl From<Coordinate> for Location {
    fn from(coordinate: Coordinate) -> Self {
        Location::Coordinate(coordinate)
    }
}

/// Formats the location the way routing providers expect it in a query string.
impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Address { address } => write!(f, "{address}"),
            Location::Coordinate(coordinate) => write!(f, "{coordinate}"),
        }
    }
}
