//! API authentication configuration.

use serde::{Deserialize, Serialize};

/// A single API key with its associated user identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    /// The API key value presented in the `X-Api-Key` header
    pub key: String,

    /// UUID of the user this key authenticates as
    pub user_id: String,

    /// Email address notifications for this user are sent to
    pub email: String,
}

/// API authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Configured API keys
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,
}

impl AuthConfig {
    /// Check if any API keys are configured
    #[must_use]
    pub fn has_api_keys(&self) -> bool {
        !self.api_keys.is_empty()
    }
}
