//! Mail dispatch port
//!
//! Best-effort outbound mail. Callers decide how to treat failures; the
//! notification sweep logs and skips, it never aborts.

use async_trait::async_trait;
use domain::EmailAddress;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Mail dispatch errors
#[derive(Debug, Error)]
pub enum MailError {
    /// The delivery service could not be reached
    #[error("Mail service unavailable: {0}")]
    Unavailable(String),

    /// The delivery service refused the message
    #[error("Mail rejected: {0}")]
    Rejected(String),
}

/// An outbound notification message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Recipient address
    pub to: EmailAddress,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
}

impl MailMessage {
    /// Create a new message
    pub fn new(to: EmailAddress, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Outbound mail interface
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MailPort: Send + Sync {
    /// Send one message; `Ok` means the delivery service confirmed
    /// acceptance
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}
