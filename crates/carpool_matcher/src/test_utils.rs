use std::collections::HashMap;

use carpool_providers::{
    coordinate::Coordinate,
    location::Location,
    route::{RoadLeg, Route},
    routing_service::{RoutingError, RoutingService, TravelMode},
};
use parking_lot::Mutex;

use crate::geo_math::EARTH_RADIUS_KM;

/// Routing service answering from fixed tables and recording every call.
pub struct StubRoutingService {
    connected: bool,
    geocodes: HashMap<String, Coordinate>,
    routes: HashMap<String, Route>,
    legs: HashMap<(String, String), RoadLeg>,
    calls: Mutex<Vec<String>>,
}

impl StubRoutingService {
    pub fn new() -> Self {
        Self {
            connected: true,
            geocodes: HashMap::new(),
            routes: HashMap::new(),
            legs: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    pub fn with_geocode(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.geocodes.insert(address.to_owned(), coordinate);
        self
    }

    pub fn with_route(mut self, origin: impl Into<Location>, route: Route) -> Self {
        self.routes.insert(origin.into().to_string(), route);
        self
    }

    pub fn with_leg(mut self, from: Coordinate, to: Coordinate, distance_km: f64, duration: &str) -> Self {
        self.legs.insert(
            (from.to_string(), to.to_string()),
            RoadLeg::new(distance_km, duration),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl RoutingService for StubRoutingService {
    async fn check_connectivity(&self) -> bool {
        self.record("check_connectivity".to_owned());
        self.connected
    }

    async fn geocode(&self, address: &str) -> Result<Coordinate, RoutingError> {
        self.record(format!("geocode {address}"));
        self.geocodes
            .get(address)
            .copied()
            .ok_or_else(|| RoutingError::Status {
                operation: "geocode",
                status: "ZERO_RESULTS".to_owned(),
                message: None,
            })
    }

    async fn route(
        &self,
        origin: &Location,
        destination: &Location,
        _mode: TravelMode,
    ) -> Result<Route, RoutingError> {
        self.record(format!("route {origin} -> {destination}"));
        self.routes
            .get(&origin.to_string())
            .cloned()
            .ok_or(RoutingError::NoResult {
                operation: "directions",
            })
    }

    async fn distance_duration(
        &self,
        origin: &Location,
        destination: &Location,
        _mode: TravelMode,
    ) -> Result<RoadLeg, RoutingError> {
        self.record(format!("distance_duration {origin} -> {destination}"));
        self.legs
            .get(&(origin.to_string(), destination.to_string()))
            .cloned()
            .ok_or(RoutingError::NoResult {
                operation: "directions",
            })
    }
}

/// A coordinate `km` kilometers due north of `origin`, so that its aerial
/// distance to `origin` is `km`.
pub fn coordinate_north_of(origin: &Coordinate, km: f64) -> Coordinate {
    let degrees = (km / EARTH_RADIUS_KM).to_degrees();
    Coordinate::new(origin.lat() + degrees, origin.lon())
}

pub fn route_through(path: Vec<Coordinate>) -> Route {
    Route {
        path,
        distance_km: 10.0,
        duration: "20 mins".to_owned(),
    }
}
