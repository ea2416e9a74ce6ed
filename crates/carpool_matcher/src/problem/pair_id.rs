use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identifies one (driver, companion) evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct PairId {
    pub driver_id: String,
    pub companion_id: String,
}

impl PairId {
    pub fn new(driver_id: impl Into<String>, companion_id: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            companion_id: companion_id.into(),
        }
    }
}

/// Formats as `{driver}_{companion}`, the key used in stored records.
impl Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.driver_id, self.companion_id)
    }
}
