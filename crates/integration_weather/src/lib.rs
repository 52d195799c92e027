//! Weather lookup integration
//!
//! HTTP client for an OpenWeatherMap-style current weather API,
//! implementing the application layer's `WeatherLookupPort`.

pub mod client;
pub mod models;

pub use client::{OpenWeatherMapClient, WeatherConfig};
