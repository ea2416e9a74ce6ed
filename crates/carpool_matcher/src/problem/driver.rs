use carpool_providers::location::Location;
use serde::{Deserialize, Serialize};

/// A participant offering a ride from their location to the office.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Driver {
    pub id: String,
    pub location: Location,
}

impl Driver {
    pub fn new(id: impl Into<String>, location: impl Into<Location>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
        }
    }
}
