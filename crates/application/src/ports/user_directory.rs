//! User directory port
//!
//! Users are managed by an external identity collaborator; this
//! interface resolves a user id to the address notifications go to.

use async_trait::async_trait;
use domain::{EmailAddress, UserId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Lookup of notification recipients
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The email address for a user, if the user is known
    async fn email_for(&self, user_id: UserId) -> Result<Option<EmailAddress>, ApplicationError>;
}
