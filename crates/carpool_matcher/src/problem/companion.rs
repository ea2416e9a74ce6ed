use carpool_providers::location::Location;
use serde::{Deserialize, Serialize};

/// A participant looking for a ride to the office.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Companion {
    pub id: String,
    pub location: Location,
}

impl Companion {
    pub fn new(id: impl Into<String>, location: impl Into<Location>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
        }
    }
}
