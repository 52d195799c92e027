//! SQLite subscription ledger implementation
//!
//! Implements the `SubscriptionLedger` port using SQLite.

use std::sync::Arc;

use application::{error::ApplicationError, ports::SubscriptionLedger};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{CityId, Subscription, SubscriptionId, UserId};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based subscription ledger
#[derive(Debug, Clone)]
pub struct SqliteSubscriptionLedger {
    pool: Arc<ConnectionPool>,
}

impl SqliteSubscriptionLedger {
    /// Create a new SQLite subscription ledger
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

/// Convert a database row to a `Subscription`
fn row_to_subscription(row: &Row<'_>) -> Result<Subscription, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let user_id_str: String = row.get(1)?;
    let city_id: i64 = row.get(2)?;
    let frequency: u32 = row.get(3)?;
    let last_notified_str: String = row.get(4)?;
    let created_str: String = row.get(5)?;

    let user_id = UserId::parse(&user_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let last_notified_at = DateTime::parse_from_rfc3339(&last_notified_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(Subscription {
        id: SubscriptionId::new(id),
        user_id,
        city_id: CityId::new(city_id),
        frequency,
        last_notified_at,
        created_at,
    })
}

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, city_id, frequency, last_notified_at, created_at";

#[async_trait]
impl SubscriptionLedger for SqliteSubscriptionLedger {
    #[instrument(skip(self), fields(user_id = %user_id, city_id = city_id.value()))]
    async fn create(
        &self,
        user_id: UserId,
        city_id: CityId,
        frequency: u32,
    ) -> Result<Subscription, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let now = Utc::now();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.execute(
                "INSERT INTO subscriptions (user_id, city_id, frequency, last_notified_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![
                    user_id.to_string(),
                    city_id.value(),
                    frequency,
                    now.to_rfc3339(),
                ],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let id = conn.last_insert_rowid();
            debug!(subscription_id = id, "Created subscription");

            Ok(Subscription {
                id: SubscriptionId::new(id),
                user_id,
                city_id,
                frequency,
                last_notified_at: now,
                created_at: now,
            })
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(subscription_id = id.value(), user_id = %user_id))]
    async fn get_for_user(
        &self,
        id: SubscriptionId,
        user_id: UserId,
    ) -> Result<Option<Subscription>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let subscription = conn
                .query_row(
                    &format!(
                        "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
                         WHERE id = ?1 AND user_id = ?2"
                    ),
                    params![id.value(), user_id.to_string()],
                    row_to_subscription,
                )
                .optional()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(found = subscription.is_some(), "Retrieved subscription");
            Ok(subscription)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, subscription), fields(subscription_id = subscription.id.value()))]
    async fn update(&self, subscription: &Subscription) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let subscription = subscription.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            // Only the editable fields change; timestamps are owned by
            // creation and mark_notified.
            let updated = conn
                .execute(
                    "UPDATE subscriptions SET city_id = ?1, frequency = ?2 WHERE id = ?3",
                    params![
                        subscription.city_id.value(),
                        subscription.frequency,
                        subscription.id.value(),
                    ],
                )
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            if updated == 0 {
                return Err(ApplicationError::Internal(format!(
                    "subscription {} vanished during update",
                    subscription.id.value()
                )));
            }

            debug!("Updated subscription");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(subscription_id = id.value()))]
    async fn delete(&self, id: SubscriptionId) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let deleted = conn
                .execute("DELETE FROM subscriptions WHERE id = ?1", [id.value()])
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(deleted = deleted > 0, "Deleted subscription");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Subscription>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
                     WHERE user_id = ?1 ORDER BY id"
                ))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let subscriptions: Vec<Subscription> = stmt
                .query_map([user_id.to_string()], row_to_subscription)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<_, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count = subscriptions.len(), "Listed user subscriptions");
            Ok(subscriptions)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Subscription>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions ORDER BY id"
                ))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let subscriptions: Vec<Subscription> = stmt
                .query_map([], row_to_subscription)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<_, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count = subscriptions.len(), "Listed all subscriptions");
            Ok(subscriptions)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(user_id = %user_id, city_id = city_id.value()))]
    async fn find_for_user_and_city(
        &self,
        user_id: UserId,
        city_id: CityId,
    ) -> Result<Option<Subscription>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let subscription = conn
                .query_row(
                    &format!(
                        "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
                         WHERE user_id = ?1 AND city_id = ?2 LIMIT 1"
                    ),
                    params![user_id.to_string(), city_id.value()],
                    row_to_subscription,
                )
                .optional()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(found = subscription.is_some(), "Looked up user's subscription for city");
            Ok(subscription)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(city_id = city_id.value()))]
    async fn count_for_city(&self, city_id: CityId) -> Result<u64, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let count: u64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM subscriptions WHERE city_id = ?1",
                    [city_id.value()],
                    |row| row.get(0),
                )
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count, "Counted subscriptions for city");
            Ok(count)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(subscription_id = id.value()))]
    async fn mark_notified(
        &self,
        id: SubscriptionId,
        at: DateTime<Utc>,
    ) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.execute(
                "UPDATE subscriptions SET last_notified_at = ?1 WHERE id = ?2",
                params![at.to_rfc3339(), id.value()],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!("Stamped last notification time");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
