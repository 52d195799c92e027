//! Weather snapshot store port
//!
//! Holds the latest known weather reading per city, refreshed in place.

use async_trait::async_trait;
use domain::{CityId, WeatherReading, WeatherSnapshot};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Storage interface for per-city weather snapshots
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Fetch the snapshot for a city, if one exists
    async fn get(&self, city_id: CityId) -> Result<Option<WeatherSnapshot>, ApplicationError>;

    /// Create the city's snapshot from a reading, or overwrite every
    /// field of the existing one and bump its refresh timestamp
    async fn upsert(
        &self,
        city_id: CityId,
        reading: &WeatherReading,
    ) -> Result<WeatherSnapshot, ApplicationError>;
}
