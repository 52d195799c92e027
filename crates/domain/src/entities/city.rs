//! City entity
//!
//! A registered location that subscriptions reference. Identity is the
//! (name, region, country code) triple; the numeric id is a storage
//! handle. Cities are created lazily by the first subscription that
//! needs them and reclaimed once no subscription references them.

use serde::{Deserialize, Serialize};

use crate::value_objects::{CityId, CityKey};

/// A registered city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Storage identifier
    pub id: CityId,
    /// Composite identity: name, region, country code
    pub key: CityKey,
}

impl City {
    /// Build a city from its storage id and composite key
    pub const fn new(id: CityId, key: CityKey) -> Self {
        Self { id, key }
    }

    /// The city name
    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// The region or state; may be empty
    pub fn region(&self) -> &str {
        self.key.region()
    }

    /// The two-letter country code
    pub fn country_code(&self) -> &str {
        self.key.country_code().as_str()
    }
}
