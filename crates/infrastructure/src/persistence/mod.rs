//! SQLite persistence adapters
//!
//! Stores implementing the application layer's registry, snapshot and
//! ledger ports, plus connection pooling and schema migrations.

pub mod city_store;
pub mod connection;
pub mod migrations;
pub mod snapshot_store;
pub mod subscription_store;

pub use city_store::SqliteCityRegistry;
pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
pub use snapshot_store::SqliteSnapshotStore;
pub use subscription_store::SqliteSubscriptionLedger;
