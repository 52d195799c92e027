//! Database migrations
//!
//! Manages database schema versioning and migrations.
//!
//! ## Rollback Strategy
//!
//! Rollbacks are manual - if a migration fails:
//! 1. Check the error message for details
//! 2. Fix the underlying issue
//! 3. Manually repair the database if needed
//! 4. Re-run migrations
//!
//! ## Adding New Migrations
//!
//! 1. Increment `SCHEMA_VERSION` constant
//! 2. Add a new `migrate_vX` function
//! 3. Update `run_migrations` to call the new function

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
///
/// # Errors
///
/// Returns an error if a migration statement fails.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Running database migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(version = 1, error = %e, "Migration V001 (initial schema) failed");
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Database migrations complete");
    } else {
        debug!(version = current_version, "Database schema is up to date");
    }

    Ok(())
}

/// Get current schema version
fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    // Create schema_version table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: Initial schema
///
/// Cities are unique by (name, region, country_code); a missing region is
/// stored as the empty string so the composite uniqueness still applies.
/// Subscriptions deliberately carry no unique (user_id, city_id) index:
/// the one-subscription-per-city rule is enforced at creation time so a
/// stale duplicate never blocks new writes.
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: Initial schema");

    conn.execute_batch(
        "
        -- Cities table
        CREATE TABLE IF NOT EXISTS cities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            region TEXT NOT NULL DEFAULT '',
            country_code TEXT NOT NULL,
            UNIQUE(name, region, country_code)
        );

        -- Weather snapshots table (one per city)
        CREATE TABLE IF NOT EXISTS weather_snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_id INTEGER NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            temperature REAL NOT NULL,
            feels_like REAL NOT NULL,
            humidity REAL NOT NULL,
            pressure REAL NOT NULL,
            visibility REAL NOT NULL,
            wind_speed REAL NOT NULL,
            clouds REAL NOT NULL DEFAULT 0,
            rain REAL NOT NULL DEFAULT 0,
            snow REAL NOT NULL DEFAULT 0,
            refreshed_at TEXT NOT NULL,
            FOREIGN KEY (city_id) REFERENCES cities(id) ON DELETE CASCADE
        );

        -- Subscriptions table
        CREATE TABLE IF NOT EXISTS subscriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            city_id INTEGER NOT NULL,
            frequency INTEGER NOT NULL,
            last_notified_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (city_id) REFERENCES cities(id) ON DELETE CASCADE
        );

        -- Indexes
        CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions(user_id);
        CREATE INDEX IF NOT EXISTS idx_subscriptions_city ON subscriptions(city_id);
        ",
    )?;

    Ok(())
}
