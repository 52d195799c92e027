//! Weather lookup port
//!
//! The external weather collaborator: given a city key it returns either
//! a structured reading or a structured error carrying the upstream
//! status code and message.

use async_trait::async_trait;
use domain::{CityKey, WeatherReading};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Weather lookup errors
#[derive(Debug, Error)]
pub enum WeatherLookupError {
    /// The upstream service answered with a non-success status; the
    /// code and message are surfaced to the caller verbatim
    #[error("{message}")]
    Rejected { code: u16, message: String },

    /// The service could not be reached
    #[error("Weather service unavailable: {0}")]
    Unavailable(String),

    /// The response body could not be interpreted
    #[error("Invalid weather response: {0}")]
    Parse(String),
}

/// External weather lookup interface
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherLookupPort: Send + Sync {
    /// Fetch the current weather for a city
    async fn current(&self, key: &CityKey) -> Result<WeatherReading, WeatherLookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_carries_upstream_message() {
        let err = WeatherLookupError::Rejected {
            code: 404,
            message: "city not found".to_string(),
        };
        assert_eq!(err.to_string(), "city not found");
    }

    #[test]
    fn unavailable_error_message() {
        let err = WeatherLookupError::Unavailable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Weather service unavailable: connection refused"
        );
    }
}
