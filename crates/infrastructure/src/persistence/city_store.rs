//! SQLite city registry implementation
//!
//! Implements the `CityRegistry` port using SQLite.

use std::sync::Arc;

use application::{error::ApplicationError, ports::CityRegistry};
use async_trait::async_trait;
use domain::{City, CityId, CityKey};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based city registry
#[derive(Debug, Clone)]
pub struct SqliteCityRegistry {
    pool: Arc<ConnectionPool>,
}

impl SqliteCityRegistry {
    /// Create a new SQLite city registry
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

/// Convert a database row to a `City`
fn row_to_city(row: &Row<'_>) -> Result<City, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let region: String = row.get(2)?;
    let country_code: String = row.get(3)?;

    let key = CityKey::new(name, region, country_code).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(City::new(CityId::new(id), key))
}

#[async_trait]
impl CityRegistry for SqliteCityRegistry {
    #[instrument(skip(self), fields(city = %key))]
    async fn find_or_register(&self, key: &CityKey) -> Result<City, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let key = key.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            // Insert-if-absent and re-select, atomic under SQLite's
            // write lock; an existing row is never touched.
            conn.execute(
                "INSERT INTO cities (name, region, country_code) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name, region, country_code) DO NOTHING",
                params![key.name(), key.region(), key.country_code().as_str()],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let city = conn
                .query_row(
                    "SELECT id, name, region, country_code FROM cities
                     WHERE name = ?1 AND region = ?2 AND country_code = ?3",
                    params![key.name(), key.region(), key.country_code().as_str()],
                    row_to_city,
                )
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(city_id = city.id.value(), "Resolved city");
            Ok(city)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(city_id = id.value()))]
    async fn get(&self, id: CityId) -> Result<Option<City>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let city = conn
                .query_row(
                    "SELECT id, name, region, country_code FROM cities WHERE id = ?1",
                    [id.value()],
                    row_to_city,
                )
                .optional()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(found = city.is_some(), "Retrieved city");
            Ok(city)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<City>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare("SELECT id, name, region, country_code FROM cities ORDER BY id")
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let cities: Vec<City> = stmt
                .query_map([], row_to_city)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<_, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count = cities.len(), "Listed cities");
            Ok(cities)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(city_id = id.value()))]
    async fn delete(&self, id: CityId) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let deleted = conn
                .execute("DELETE FROM cities WHERE id = ?1", [id.value()])
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(deleted = deleted > 0, "Deleted city");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
