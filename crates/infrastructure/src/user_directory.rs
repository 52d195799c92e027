//! Config-backed user directory
//!
//! Users live in the API key configuration; this adapter resolves a
//! user id to the notification address declared alongside their key.

use std::collections::HashMap;
use std::sync::Arc;

use application::{error::ApplicationError, ports::UserDirectory};
use async_trait::async_trait;
use domain::{EmailAddress, UserId};
use tracing::{debug, instrument};

use crate::config::AuthConfig;

/// User directory built from the auth configuration
#[derive(Debug, Clone)]
pub struct ConfigUserDirectory {
    addresses: Arc<HashMap<UserId, EmailAddress>>,
}

impl ConfigUserDirectory {
    /// Build the directory from configured API key entries
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an entry carries an invalid
    /// user id or email address.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ApplicationError> {
        let mut addresses = HashMap::with_capacity(config.api_keys.len());

        for entry in &config.api_keys {
            let user_id = UserId::parse(&entry.user_id).map_err(|e| {
                ApplicationError::Configuration(format!(
                    "invalid user_id in auth.api_keys: {e}"
                ))
            })?;
            let email = EmailAddress::new(&entry.email).map_err(|e| {
                ApplicationError::Configuration(format!("invalid email in auth.api_keys: {e}"))
            })?;
            addresses.insert(user_id, email);
        }

        debug!(users = addresses.len(), "Built user directory from config");
        Ok(Self {
            addresses: Arc::new(addresses),
        })
    }
}

#[async_trait]
impl UserDirectory for ConfigUserDirectory {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn email_for(&self, user_id: UserId) -> Result<Option<EmailAddress>, ApplicationError> {
        Ok(self.addresses.get(&user_id).cloned())
    }
}
