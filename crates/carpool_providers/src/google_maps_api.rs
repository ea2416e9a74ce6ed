use std::time::Duration;

use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    coordinate::Coordinate,
    location::Location,
    route::{RoadLeg, Route},
    routing_service::{RoutingError, RoutingService, TravelMode},
};

pub const GOOGLE_MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api";
pub const GOOGLE_MAPS_API_KEY_ENV_VAR: &str = "GOOGLEMAPS_KEY";

const GEOCODE_API_PATH: &str = "/geocode/json";
const DIRECTIONS_API_PATH: &str = "/directions/json";

const GEOCODE_OPERATION: &str = "geocode";
const DIRECTIONS_OPERATION: &str = "directions";

const POLYLINE_PRECISION: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingApiKey(&'static str),
}

#[derive(Debug, Clone)]
pub struct GoogleMapsClientParams {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub connectivity_timeout: Duration,
    /// Attempts per request, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, doubled on every further retry.
    pub retry_delay: Duration,
}

impl GoogleMapsClientParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GOOGLE_MAPS_API_URL.to_owned(),
            request_timeout: Duration::from_secs(10),
            connectivity_timeout: Duration::from_secs(5),
            max_attempts: 3,
            retry_delay: Duration::from_millis(250),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(GOOGLE_MAPS_API_KEY_ENV_VAR) {
            Ok(api_key) if !api_key.trim().is_empty() => Ok(Self::new(api_key)),
            _ => {
                error!("{} not found in environment", GOOGLE_MAPS_API_KEY_ENV_VAR);
                Err(ConfigError::MissingApiKey(GOOGLE_MAPS_API_KEY_ENV_VAR))
            }
        }
    }
}

trait ApiResponse: DeserializeOwned + Send {
    fn status(&self) -> &str;
    fn error_message(&self) -> Option<&str>;
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

impl ApiResponse for GeocodeResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[derive(Deserialize)]
struct TextValue {
    text: String,
    value: f64,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    /// Value in meters
    distance: TextValue,
    /// Value in seconds, text like "24 mins"
    duration: TextValue,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
    overview_polyline: OverviewPolyline,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

impl ApiResponse for DirectionsResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

fn check_status<T: ApiResponse>(operation: &'static str, body: &T) -> Result<(), RoutingError> {
    if body.status() == "OK" {
        Ok(())
    } else {
        Err(RoutingError::Status {
            operation,
            status: body.status().to_owned(),
            message: body.error_message().map(str::to_owned),
        })
    }
}

fn coordinate_from_geocode(response: GeocodeResponse) -> Result<Coordinate, RoutingError> {
    response
        .results
        .into_iter()
        .next()
        .map(|result| {
            let location = result.geometry.location;
            Coordinate::new(location.lat, location.lng)
        })
        .ok_or(RoutingError::NoResult {
            operation: GEOCODE_OPERATION,
        })
}

fn first_route(response: DirectionsResponse) -> Result<DirectionsRoute, RoutingError> {
    response
        .routes
        .into_iter()
        .find(|route| !route.legs.is_empty())
        .ok_or(RoutingError::NoResult {
            operation: DIRECTIONS_OPERATION,
        })
}

fn road_leg_from_directions(response: DirectionsResponse) -> Result<RoadLeg, RoutingError> {
    let route = first_route(response)?;
    let leg = &route.legs[0];

    Ok(RoadLeg {
        distance_km: leg.distance.value / 1000.0,
        duration: leg.duration.text.clone(),
    })
}

fn route_from_directions(response: DirectionsResponse) -> Result<Route, RoutingError> {
    let route = first_route(response)?;
    let leg = &route.legs[0];

    let line = polyline::decode_polyline(&route.overview_polyline.points, POLYLINE_PRECISION)
        .map_err(|err| RoutingError::Polyline(err.to_string()))?;

    Ok(Route {
        path: line.coords().map(|coord| Coordinate::from(*coord)).collect(),
        distance_km: leg.distance.value / 1000.0,
        duration: leg.duration.text.clone(),
    })
}

pub struct GoogleMapsClient {
    params: GoogleMapsClientParams,
    client: reqwest::Client,
}

impl GoogleMapsClient {
    pub fn new(params: GoogleMapsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    async fn request<T: ApiResponse>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RoutingError> {
        let max_attempts = self.params.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.send::<T>(operation, path, query).await {
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.params.retry_delay * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        operation,
                        attempt,
                        error = %err,
                        "GoogleMapsApi: transient failure, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send<T: ApiResponse>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RoutingError> {
        let response = self
            .client
            .get(format!("{}{}", self.params.base_url, path))
            .query(query)
            .query(&[("key", &self.params.api_key)])
            .timeout(self.params.request_timeout)
            .send()
            .await?;

        let body: T = self.handle_response(response).await?;
        check_status(operation, &body)?;

        Ok(body)
    }

    async fn handle_response<T: ApiResponse>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, RoutingError> {
        if response.status().is_success() {
            let body: T = response.json().await?;
            Ok(body)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(RoutingError::Api { status, message })
        }
    }

    async fn directions(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> Result<DirectionsResponse, RoutingError> {
        let query = [
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", mode.to_string()),
        ];

        self.request(DIRECTIONS_OPERATION, DIRECTIONS_API_PATH, &query)
            .await
    }
}

impl RoutingService for GoogleMapsClient {
    async fn check_connectivity(&self) -> bool {
        let result = self
            .client
            .get(format!("{}{}", self.params.base_url, GEOCODE_API_PATH))
            .query(&[("address", "test"), ("key", self.params.api_key.as_str())])
            .timeout(self.params.connectivity_timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => {
                debug!("GoogleMapsApi: connectivity check succeeded");
                true
            }
            Err(err) => {
                error!("GoogleMapsApi: connectivity check failed: {}", err);
                false
            }
        }
    }

    async fn geocode(&self, address: &str) -> Result<Coordinate, RoutingError> {
        let query = [("address", address.to_owned())];
        let response: GeocodeResponse = self
            .request(GEOCODE_OPERATION, GEOCODE_API_PATH, &query)
            .await?;

        coordinate_from_geocode(response)
    }

    async fn route(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> Result<Route, RoutingError> {
        let response = self.directions(origin, destination, mode).await?;
        let route = route_from_directions(response)?;

        debug!(
            %origin,
            %destination,
            nodes = route.path.len(),
            "GoogleMapsApi: fetched route"
        );

        Ok(route)
    }

    async fn distance_duration(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> Result<RoadLeg, RoutingError> {
        let response = self.directions(origin, destination, mode).await?;
        road_leg_from_directions(response)
    }
}
