//! Weather snapshot entity
//!
//! The latest known observation for a city, exactly one per city.
//! Refreshes overwrite the stored reading in place and bump the
//! refresh timestamp; snapshots are never appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CityId, WeatherReading};

/// The latest weather observation held for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// The city this snapshot belongs to
    pub city_id: CityId,
    /// The stored observation
    pub reading: WeatherReading,
    /// When the observation was last refreshed
    pub refreshed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Create a snapshot from a fresh reading
    pub fn new(city_id: CityId, reading: WeatherReading) -> Self {
        Self {
            city_id,
            reading,
            refreshed_at: Utc::now(),
        }
    }

    /// Overwrite the stored reading and bump the refresh timestamp
    pub fn refresh(&mut self, reading: WeatherReading) {
        self.reading = reading;
        self.refreshed_at = Utc::now();
    }

    /// The presentation-safe view: meteorological fields only, no
    /// storage identifiers or refresh bookkeeping
    pub const fn public_view(&self) -> &WeatherReading {
        &self.reading
    }
}
