//! City registry port
//!
//! The canonical list of cities that subscriptions reference,
//! deduplicated by the (name, region, country code) triple.
//! Implemented by a persistence adapter in the infrastructure layer.

use async_trait::async_trait;
use domain::{City, CityId, CityKey};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Storage interface for registered cities
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CityRegistry: Send + Sync {
    /// Look up a city by its composite key, inserting it if absent.
    ///
    /// Idempotent; never overwrites an existing row's fields. The
    /// lookup-or-create must be atomic with respect to concurrent calls
    /// for the same key.
    async fn find_or_register(&self, key: &CityKey) -> Result<City, ApplicationError>;

    /// Fetch a city by id
    async fn get(&self, id: CityId) -> Result<Option<City>, ApplicationError>;

    /// Enumerate every registered city, used by the refresh sweep
    async fn list_all(&self) -> Result<Vec<City>, ApplicationError>;

    /// Remove a city row; its weather snapshot and any remaining
    /// subscriptions are cascade-deleted by storage
    async fn delete(&self, id: CityId) -> Result<(), ApplicationError>;
}
