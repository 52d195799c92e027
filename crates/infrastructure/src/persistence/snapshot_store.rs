//! SQLite weather snapshot store implementation
//!
//! Implements the `SnapshotStore` port using SQLite. Exactly one row
//! per city; refreshes overwrite the row in place.

use std::sync::Arc;

use application::{error::ApplicationError, ports::SnapshotStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{CityId, WeatherReading, WeatherSnapshot};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based weather snapshot store
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteSnapshotStore {
    /// Create a new SQLite snapshot store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

/// Convert a database row to a `WeatherSnapshot`
fn row_to_snapshot(row: &Row<'_>) -> Result<WeatherSnapshot, rusqlite::Error> {
    let city_id: i64 = row.get(0)?;
    let refreshed_at_str: String = row.get(11)?;

    let reading = WeatherReading {
        description: row.get(1)?,
        temperature: row.get(2)?,
        feels_like: row.get(3)?,
        humidity: row.get(4)?,
        pressure: row.get(5)?,
        visibility: row.get(6)?,
        wind_speed: row.get(7)?,
        clouds: row.get(8)?,
        rain: row.get(9)?,
        snow: row.get(10)?,
    };

    let refreshed_at = DateTime::parse_from_rfc3339(&refreshed_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(WeatherSnapshot {
        city_id: CityId::new(city_id),
        reading,
        refreshed_at,
    })
}

const SNAPSHOT_COLUMNS: &str = "city_id, description, temperature, feels_like, humidity, \
     pressure, visibility, wind_speed, clouds, rain, snow, refreshed_at";

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    #[instrument(skip(self), fields(city_id = city_id.value()))]
    async fn get(&self, city_id: CityId) -> Result<Option<WeatherSnapshot>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let snapshot = conn
                .query_row(
                    &format!("SELECT {SNAPSHOT_COLUMNS} FROM weather_snapshots WHERE city_id = ?1"),
                    [city_id.value()],
                    row_to_snapshot,
                )
                .optional()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(found = snapshot.is_some(), "Retrieved snapshot");
            Ok(snapshot)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, reading), fields(city_id = city_id.value()))]
    async fn upsert(
        &self,
        city_id: CityId,
        reading: &WeatherReading,
    ) -> Result<WeatherSnapshot, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let reading = reading.clone();
        let now = Utc::now();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.execute(
                "INSERT INTO weather_snapshots
                     (city_id, description, temperature, feels_like, humidity, pressure,
                      visibility, wind_speed, clouds, rain, snow, refreshed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(city_id) DO UPDATE SET
                     description = excluded.description,
                     temperature = excluded.temperature,
                     feels_like = excluded.feels_like,
                     humidity = excluded.humidity,
                     pressure = excluded.pressure,
                     visibility = excluded.visibility,
                     wind_speed = excluded.wind_speed,
                     clouds = excluded.clouds,
                     rain = excluded.rain,
                     snow = excluded.snow,
                     refreshed_at = excluded.refreshed_at",
                params![
                    city_id.value(),
                    reading.description,
                    reading.temperature,
                    reading.feels_like,
                    reading.humidity,
                    reading.pressure,
                    reading.visibility,
                    reading.wind_speed,
                    reading.clouds,
                    reading.rain,
                    reading.snow,
                    now.to_rfc3339(),
                ],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!("Upserted snapshot");
            Ok(WeatherSnapshot {
                city_id,
                reading,
                refreshed_at: now,
            })
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
