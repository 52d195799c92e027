//! Transactional mail HTTP client

use application::ports::{MailError, MailMessage, MailPort};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Mail delivery service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Delivery API base URL (default: <http://localhost:8025>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Token sent in the `X-Server-Token` header
    #[serde(default)]
    pub api_token: String,

    /// Sender address for all notifications
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8025".to_string()
}

fn default_sender() -> String {
    "weather@nimbus.local".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: String::new(),
            sender: default_sender(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Request body for the delivery API
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

/// HTTP client for the mail delivery API
#[derive(Debug)]
pub struct HttpMailClient {
    client: Client,
    config: MailConfig,
}

impl HttpMailClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MailError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl MailPort for HttpMailClient {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let url = format!("{}/email", self.config.base_url);
        let body = SendRequest {
            from: &self.config.sender,
            to: message.to.as_str(),
            subject: &message.subject,
            text_body: &message.body,
        };

        debug!(url = %url, "Dispatching notification mail");

        let response = self
            .client
            .post(&url)
            .header("X-Server-Token", &self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(MailError::Unavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(if detail.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {detail}")
            }));
        }

        debug!("Mail accepted by delivery service");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = MailConfig::default();
        assert_eq!(config.base_url, "http://localhost:8025");
        assert_eq!(config.sender, "weather@nimbus.local");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_token.is_empty());
    }

    #[test]
    fn client_creation_succeeds() {
        assert!(HttpMailClient::new(MailConfig::default()).is_ok());
    }

    #[test]
    fn send_request_serializes_flat() {
        let request = SendRequest {
            from: "weather@nimbus.local",
            to: "user@example.com",
            subject: "Weather update",
            text_body: "Sunny",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["from"], "weather@nimbus.local");
        assert_eq!(json["to"], "user@example.com");
        assert_eq!(json["subject"], "Weather update");
        assert_eq!(json["text_body"], "Sunny");
    }
}
