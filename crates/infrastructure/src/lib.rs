//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the SQLite persistence adapters and configuration loading.

pub mod config;
pub mod persistence;
pub mod user_directory;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig, SweepConfig};
pub use persistence::{
    ConnectionPool, SqliteCityRegistry, SqliteSnapshotStore, SqliteSubscriptionLedger, create_pool,
};
pub use user_directory::ConfigUserDirectory;
