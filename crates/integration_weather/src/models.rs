//! Raw response types for the current weather API

use domain::WeatherReading;
use serde::Deserialize;

/// Successful current weather response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Condition list; the first entry carries the description
    #[serde(default)]
    pub weather: Vec<ConditionData>,
    /// Temperature, humidity and pressure block
    pub main: MainData,
    /// Visibility in metres; absent for some stations
    #[serde(default)]
    pub visibility: f64,
    /// Wind block
    pub wind: WindData,
    /// Cloud cover block; may be absent
    #[serde(default)]
    pub clouds: Option<CloudsData>,
    /// Rain volumes; absent when there is no rain
    #[serde(default)]
    pub rain: Option<PrecipitationData>,
    /// Snow volumes; absent when there is no snow
    #[serde(default)]
    pub snow: Option<PrecipitationData>,
}

/// One entry of the `weather` condition list
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionData {
    /// Human-readable description, e.g. "light rain"
    #[serde(default)]
    pub description: String,
}

/// The `main` block of the response
#[derive(Debug, Clone, Deserialize)]
pub struct MainData {
    /// Temperature in degrees Celsius (metric units requested)
    pub temp: f64,
    /// Perceived temperature
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
}

/// The `wind` block of the response
#[derive(Debug, Clone, Deserialize)]
pub struct WindData {
    /// Wind speed in metres per second
    pub speed: f64,
}

/// The `clouds` block of the response
#[derive(Debug, Clone, Deserialize)]
pub struct CloudsData {
    /// Cloud cover in percent
    #[serde(default)]
    pub all: f64,
}

/// Rain or snow volume block
#[derive(Debug, Clone, Deserialize)]
pub struct PrecipitationData {
    /// Volume over the last hour in millimetres
    #[serde(rename = "1h", default)]
    pub one_hour: f64,
}

/// Error body returned with a non-success status
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Upstream error message, e.g. "city not found"
    #[serde(default)]
    pub message: String,
}

impl ApiResponse {
    /// Flatten the raw response into a domain reading; absent cloud,
    /// rain and snow fields become zero
    pub fn into_reading(self) -> WeatherReading {
        WeatherReading {
            description: self
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            visibility: self.visibility,
            wind_speed: self.wind.speed,
            clouds: self.clouds.map_or(0.0, |c| c.all),
            rain: self.rain.map_or(0.0, |r| r.one_hour),
            snow: self.snow.map_or(0.0, |s| s.one_hour),
        }
    }
}
