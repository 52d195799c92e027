//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `sweeps`: Background refresh and notification intervals
//! - `auth`: API key authentication
//!
//! Weather and mail client settings live in their integration crates
//! and are embedded here as sections of the main config.

mod auth;
mod database;
mod server;
mod sweeps;

use serde::{Deserialize, Serialize};

pub use auth::{ApiKeyEntry, AuthConfig};
pub use database::DatabaseConfig;
pub use integration_mail::MailConfig;
pub use integration_weather::WeatherConfig;
pub use server::ServerConfig;
pub use sweeps::SweepConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Mail delivery configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Background sweep configuration
    #[serde(default)]
    pub sweeps: SweepConfig,

    /// API authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment sources cannot be
    /// parsed into a valid configuration.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // Load from file if exists
            .add_source(config::File::with_name("nimbus").required(false))
            // Override with environment variables (e.g., NIMBUS_SERVER_PORT)
            .add_source(
                config::Environment::with_prefix("NIMBUS")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
