//! Subscription reconciliation service
//!
//! Orchestrates subscription creation, edit, delete and listing: the
//! weather lookup happens first and its failure aborts the request with
//! no side effects; cities are registered lazily and deduplicated by
//! their composite key; snapshots are created once per city and shared;
//! structural changes trigger a full-registry orphan sweep.

use std::sync::Arc;

use domain::{City, CityKey, DomainError, Subscription, SubscriptionId, UserId, WeatherReading};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    CityRegistry, SnapshotStore, SubscriptionLedger, WeatherLookupError, WeatherLookupPort,
};

/// Public city fields as presented to the user collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityView {
    /// City name
    pub name: String,
    /// Region or state; may be empty
    pub state: String,
    /// Two-letter country code
    pub country_code: String,
}

impl From<&City> for CityView {
    fn from(city: &City) -> Self {
        Self {
            name: city.name().to_string(),
            state: city.region().to_string(),
            country_code: city.country_code().to_string(),
        }
    }
}

/// Public subscription fields; internal timestamps are stripped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionView {
    /// Subscription id, needed for edit and delete
    pub id: SubscriptionId,
    /// The subscribed city
    pub city: CityView,
    /// Notification cadence in the configured unit
    pub notification_frequency: u32,
}

/// Reconciliation engine for the user-facing subscription operations
pub struct SubscriptionService {
    cities: Arc<dyn CityRegistry>,
    snapshots: Arc<dyn SnapshotStore>,
    ledger: Arc<dyn SubscriptionLedger>,
    weather: Arc<dyn WeatherLookupPort>,
}

impl std::fmt::Debug for SubscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionService").finish_non_exhaustive()
    }
}

impl SubscriptionService {
    /// Create the service over its storage and lookup ports
    pub fn new(
        cities: Arc<dyn CityRegistry>,
        snapshots: Arc<dyn SnapshotStore>,
        ledger: Arc<dyn SubscriptionLedger>,
        weather: Arc<dyn WeatherLookupPort>,
    ) -> Self {
        Self {
            cities,
            snapshots,
            ledger,
            weather,
        }
    }

    /// Create a subscription for a user.
    ///
    /// The external weather lookup runs first; if it rejects the city
    /// the whole operation aborts with no writes. A city row is
    /// registered if this is the first subscription to it, and its
    /// snapshot is created from the fetched reading only when the city
    /// has none yet.
    #[instrument(skip(self), fields(user_id = %user_id, city = %key))]
    pub async fn create(
        &self,
        user_id: UserId,
        key: CityKey,
        frequency: u32,
    ) -> Result<Subscription, ApplicationError> {
        validate_frequency(frequency)?;

        let reading = self.lookup(&key).await?;
        let city = self.cities.find_or_register(&key).await?;

        if self
            .ledger
            .find_for_user_and_city(user_id, city.id)
            .await?
            .is_some()
        {
            debug!(city_id = %city.id, "User already subscribed to this city");
            return Err(ApplicationError::DuplicateSubscription);
        }

        self.ensure_snapshot(&city, &reading).await?;

        let subscription = self.ledger.create(user_id, city.id, frequency).await?;
        info!(subscription_id = %subscription.id, city_id = %city.id, "Subscription created");
        Ok(subscription)
    }

    /// Edit an existing subscription: reassign its city and optionally
    /// its frequency, then reclaim any city left without references.
    #[instrument(skip(self), fields(user_id = %user_id, subscription_id = %id, city = %key))]
    pub async fn edit(
        &self,
        user_id: UserId,
        id: SubscriptionId,
        key: CityKey,
        frequency: Option<u32>,
    ) -> Result<Subscription, ApplicationError> {
        if let Some(frequency) = frequency {
            validate_frequency(frequency)?;
        }

        let mut subscription = self
            .ledger
            .get_for_user(id, user_id)
            .await?
            .ok_or(ApplicationError::NotFoundForUser(id.value()))?;

        let reading = self.lookup(&key).await?;
        let city = self.cities.find_or_register(&key).await?;
        self.ensure_snapshot(&city, &reading).await?;

        subscription.reassign_city(city.id);
        if let Some(frequency) = frequency {
            subscription.set_frequency(frequency);
        }
        self.ledger.update(&subscription).await?;

        // The subscription may have moved off its old city.
        self.cleanup_orphans().await?;

        info!(subscription_id = %subscription.id, city_id = %city.id, "Subscription edited");
        Ok(subscription)
    }

    /// Delete a user's subscription and reclaim orphaned cities
    #[instrument(skip(self), fields(user_id = %user_id, subscription_id = %id))]
    pub async fn delete(&self, user_id: UserId, id: SubscriptionId) -> Result<(), ApplicationError> {
        let subscription = self
            .ledger
            .get_for_user(id, user_id)
            .await?
            .ok_or(ApplicationError::NotFoundForUser(id.value()))?;

        self.ledger.delete(subscription.id).await?;
        self.cleanup_orphans().await?;

        info!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }

    /// List a user's subscriptions as public views
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list(&self, user_id: UserId) -> Result<Vec<SubscriptionView>, ApplicationError> {
        let subscriptions = self.ledger.list_for_user(user_id).await?;
        let mut views = Vec::with_capacity(subscriptions.len());

        for subscription in subscriptions {
            let Some(city) = self.cities.get(subscription.city_id).await? else {
                warn!(
                    subscription_id = %subscription.id,
                    city_id = %subscription.city_id,
                    "Subscription references a missing city, skipping"
                );
                continue;
            };
            views.push(SubscriptionView {
                id: subscription.id,
                city: CityView::from(&city),
                notification_frequency: subscription.frequency,
            });
        }

        Ok(views)
    }

    /// Delete every city with zero referencing subscriptions; snapshots
    /// cascade with their city. Full-registry sweep rather than a
    /// targeted check on the city that lost a reference.
    #[instrument(skip(self))]
    pub async fn cleanup_orphans(&self) -> Result<usize, ApplicationError> {
        let mut removed = 0;

        for city in self.cities.list_all().await? {
            if self.ledger.count_for_city(city.id).await? == 0 {
                self.cities.delete(city.id).await?;
                debug!(city_id = %city.id, city = %city.key, "Removed orphaned city");
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "Orphaned cities cleaned up");
        }
        Ok(removed)
    }

    async fn lookup(&self, key: &CityKey) -> Result<WeatherReading, ApplicationError> {
        self.weather.current(key).await.map_err(|e| match e {
            WeatherLookupError::Rejected { code, message } => {
                ApplicationError::CityNotFound { code, message }
            },
            WeatherLookupError::Unavailable(msg) | WeatherLookupError::Parse(msg) => {
                ApplicationError::ExternalService(msg)
            },
        })
    }

    /// Create the city's snapshot from the fetched reading only when no
    /// snapshot exists yet; an earlier subscriber's snapshot is reused
    /// untouched.
    async fn ensure_snapshot(
        &self,
        city: &City,
        reading: &WeatherReading,
    ) -> Result<(), ApplicationError> {
        if self.snapshots.get(city.id).await?.is_none() {
            self.snapshots.upsert(city.id, reading).await?;
            debug!(city_id = %city.id, "Created initial weather snapshot");
        }
        Ok(())
    }
}

fn validate_frequency(frequency: u32) -> Result<(), ApplicationError> {
    if frequency == 0 {
        return Err(DomainError::validation("notification frequency must be positive").into());
    }
    Ok(())
}
