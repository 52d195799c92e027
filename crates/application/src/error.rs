//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// External weather lookup rejected the requested city; carries the
    /// upstream status code and message verbatim
    #[error("{message}")]
    CityNotFound { code: u16, message: String },

    /// The user already holds a subscription to this city
    #[error("You are already subscribed to this city. Please, edit an existing subscription")]
    DuplicateSubscription,

    /// Subscription id does not exist or belongs to another user
    #[error("Subscription with id={0} does not exist for this user")]
    NotFoundForUser(i64),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_))
    }
}
