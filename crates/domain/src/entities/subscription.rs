//! Subscription entity
//!
//! Links one user to one city with a notification cadence. A user may
//! hold at most one subscription per city; that rule is enforced by the
//! creation flow, not by storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CityId, FrequencyUnit, SubscriptionId, UserId};

/// A user's weather subscription for a single city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Storage identifier
    pub id: SubscriptionId,
    /// The owning user
    pub user_id: UserId,
    /// The referenced city
    pub city_id: CityId,
    /// Notification cadence, a positive count of the configured unit
    pub frequency: u32,
    /// When the user was last notified
    pub last_notified_at: DateTime<Utc>,
    /// When the subscription was created
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a subscription; the notification clock starts at creation,
    /// so the first notification comes after one full period
    pub fn new(id: SubscriptionId, user_id: UserId, city_id: CityId, frequency: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            city_id,
            frequency,
            last_notified_at: now,
            created_at: now,
        }
    }

    /// Whether a notification is due: the elapsed time since the last
    /// notification strictly exceeds the frequency in the given unit.
    /// Exactly-equal elapsed time is not due.
    pub fn is_due(&self, now: DateTime<Utc>, unit: FrequencyUnit) -> bool {
        now - self.last_notified_at > unit.span(self.frequency)
    }

    /// Record a confirmed notification send
    pub fn mark_notified(&mut self, now: DateTime<Utc>) {
        self.last_notified_at = now;
    }

    /// Move the subscription to another city; id and user never change
    pub fn reassign_city(&mut self, city_id: CityId) {
        self.city_id = city_id;
    }

    /// Change the notification cadence
    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency;
    }
}
