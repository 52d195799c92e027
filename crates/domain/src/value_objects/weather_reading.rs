//! A single weather observation for a city
//!
//! This is both what the external lookup collaborator returns and the
//! public, presentation-safe view of a stored snapshot (it carries no
//! storage identifiers or refresh bookkeeping).

use serde::{Deserialize, Serialize};

/// The meteorological fields of one observation
///
/// Cloud cover, rain and snow volumes default to zero when the upstream
/// reading omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Human-readable conditions, e.g. "light rain"
    pub description: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Perceived temperature in degrees Celsius
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Visibility in metres
    pub visibility: f64,
    /// Wind speed in metres per second
    pub wind_speed: f64,
    /// Cloud cover in percent
    #[serde(default)]
    pub clouds: f64,
    /// Rain volume over the last hour in millimetres
    #[serde(default)]
    pub rain: f64,
    /// Snow volume over the last hour in millimetres
    #[serde(default)]
    pub snow: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_precipitation_fields_default_to_zero() {
        let json = r#"{
            "description": "clear sky",
            "temperature": 21.5,
            "feels_like": 20.9,
            "humidity": 40.0,
            "pressure": 1015.0,
            "visibility": 10000.0,
            "wind_speed": 3.1
        }"#;
        let reading: WeatherReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.clouds, 0.0);
        assert_eq!(reading.rain, 0.0);
        assert_eq!(reading.snow, 0.0);
    }

    #[test]
    fn default_reading_is_all_zero() {
        let reading = WeatherReading::default();
        assert!(reading.description.is_empty());
        assert_eq!(reading.temperature, 0.0);
    }
}
