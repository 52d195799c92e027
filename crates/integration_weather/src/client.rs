//! Current weather HTTP client
//!
//! Fetches current conditions for a city by name from an
//! OpenWeatherMap-style API, in metric units.

use application::ports::{WeatherLookupError, WeatherLookupPort};
use async_trait::async_trait;
use domain::{CityKey, WeatherReading};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::models::{ApiResponse, ErrorBody};

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `appid` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

/// HTTP client for the current weather endpoint
#[derive(Debug)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherMapClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherLookupError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherLookupError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The `q` query parameter: name, optional region and country code,
    /// comma-separated with empty segments skipped
    fn build_query(key: &CityKey) -> String {
        let mut query = key.name().to_string();
        if !key.region().is_empty() {
            query.push(',');
            query.push_str(key.region());
        }
        query.push(',');
        query.push_str(key.country_code().as_str());
        query
    }
}

#[async_trait]
impl WeatherLookupPort for OpenWeatherMapClient {
    #[instrument(skip(self), fields(city = %key))]
    async fn current(&self, key: &CityKey) -> Result<WeatherReading, WeatherLookupError> {
        let url = format!("{}/weather", self.config.base_url);
        let query = Self::build_query(key);

        debug!(url = %url, q = %query, "Fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.config.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherLookupError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(WeatherLookupError::Unavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            // The upstream error body carries the message users see,
            // e.g. {"cod": "404", "message": "city not found"}.
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .filter(|body| !body.message.is_empty())
                .map_or_else(|| format!("HTTP {status}"), |body| body.message);

            return Err(WeatherLookupError::Rejected {
                code: status.as_u16(),
                message,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherLookupError::Parse(e.to_string()))?;

        Ok(api_response.into_reading())
    }
}
