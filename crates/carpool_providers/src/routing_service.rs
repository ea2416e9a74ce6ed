use std::{fmt::Display, future::Future};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    coordinate::Coordinate,
    location::Location,
    route::{RoadLeg, Route},
};

#[derive(Debug, Default, Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Driving => "driving",
                TravelMode::Walking => "walking",
                TravelMode::Bicycling => "bicycling",
                TravelMode::Transit => "transit",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("{operation} failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        operation: &'static str,
        status: String,
        message: Option<String>,
    },

    #[error("{operation} returned no result")]
    NoResult { operation: &'static str },

    #[error("Invalid polyline: {0}")]
    Polyline(String),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl RoutingError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RoutingError::Request(err) => err.is_timeout() || err.is_connect(),
            RoutingError::Api { status, .. } => *status == 429 || *status >= 500,
            RoutingError::Status { status, .. } => {
                matches!(status.as_str(), "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR")
            }
            RoutingError::NoResult { .. }
            | RoutingError::Polyline(_)
            | RoutingError::Deserialize(_) => false,
        }
    }
}

/// Geocoding and road routing used by the matcher.
///
/// Every call may fail independently; callers decide whether a failure is
/// fatal or only degrades the entity it was made for.
pub trait RoutingService {
    /// Cheap reachability check, run once before any matching work.
    fn check_connectivity(&self) -> impl Future<Output = bool> + Send;

    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinate, RoutingError>> + Send;

    fn route(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> impl Future<Output = Result<Route, RoutingError>> + Send;

    fn distance_duration(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> impl Future<Output = Result<RoadLeg, RoutingError>> + Send;
}
