use std::io::Read;

use carpool_providers::location::Location;
use serde::{Deserialize, Serialize};

use crate::{
    matcher::match_orchestrator::MatchRequest,
    problem::{companion::Companion, driver::Driver},
};

pub const DEFAULT_OFFICE_ADDRESS: &str = "Brigade Tech Garden, Bangalore";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Active,
    Matched,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A stored ride request. The location fields sit next to the request fields,
/// e.g. `{ "user_id": "u1", "status": "active", "lat": 12.9, "lon": 77.6 }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanionRequest {
    pub user_id: String,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriverOffer {
    pub driver_id: String,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub location: Location,
}

fn default_office() -> Location {
    Location::address(DEFAULT_OFFICE_ADDRESS)
}

/// Snapshot of the ride requests and offers a matching run is triggered with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchInput {
    #[serde(default = "default_office")]
    pub office: Location,
    #[serde(default)]
    pub companion_requests: Vec<CompanionRequest>,
    #[serde(default)]
    pub driver_offers: Vec<DriverOffer>,
}

impl MatchInput {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn active_companions(&self) -> Vec<Companion> {
        self.companion_requests
            .iter()
            .filter(|request| request.status == RequestStatus::Active)
            .map(|request| Companion::new(&request.user_id, request.location.clone()))
            .collect()
    }

    pub fn active_drivers(&self) -> Vec<Driver> {
        self.driver_offers
            .iter()
            .filter(|offer| offer.status == RequestStatus::Active)
            .map(|offer| Driver::new(&offer.driver_id, offer.location.clone()))
            .collect()
    }

    pub fn into_request(self, office: Option<Location>) -> MatchRequest {
        MatchRequest {
            drivers: self.active_drivers(),
            companions: self.active_companions(),
            office: office.unwrap_or(self.office),
        }
    }
}
