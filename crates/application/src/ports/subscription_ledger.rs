//! Subscription ledger port
//!
//! Per-user records linking a user to a city and a notification cadence.
//! The one-subscription-per-user-per-city rule is enforced by the
//! creation flow, not by this interface or its storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{CityId, Subscription, SubscriptionId, UserId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Storage interface for subscriptions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubscriptionLedger: Send + Sync {
    /// Insert a new subscription; the notification clock starts now
    async fn create(
        &self,
        user_id: UserId,
        city_id: CityId,
        frequency: u32,
    ) -> Result<Subscription, ApplicationError>;

    /// Fetch a subscription only if it belongs to the given user
    async fn get_for_user(
        &self,
        id: SubscriptionId,
        user_id: UserId,
    ) -> Result<Option<Subscription>, ApplicationError>;

    /// Persist changed city/frequency fields of an existing subscription
    async fn update(&self, subscription: &Subscription) -> Result<(), ApplicationError>;

    /// Remove a subscription row
    async fn delete(&self, id: SubscriptionId) -> Result<(), ApplicationError>;

    /// All subscriptions held by one user
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Subscription>, ApplicationError>;

    /// Every subscription, used by the notification sweep
    async fn list_all(&self) -> Result<Vec<Subscription>, ApplicationError>;

    /// The user's subscription to a city, if any; backs the duplicate
    /// check during creation
    async fn find_for_user_and_city(
        &self,
        user_id: UserId,
        city_id: CityId,
    ) -> Result<Option<Subscription>, ApplicationError>;

    /// Number of subscriptions referencing a city; zero means the city
    /// is orphaned
    async fn count_for_city(&self, city_id: CityId) -> Result<u64, ApplicationError>;

    /// Stamp the last-notified timestamp, leaving other fields untouched
    async fn mark_notified(
        &self,
        id: SubscriptionId,
        at: DateTime<Utc>,
    ) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_is_object_safe() {
        fn assert_object_safe(_: &dyn SubscriptionLedger) {}
        let mock = MockSubscriptionLedger::new();
        assert_object_safe(&mock);
    }
}
