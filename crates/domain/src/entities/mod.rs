//! Domain entities

mod city;
mod subscription;
mod weather_snapshot;

pub use city::City;
pub use subscription::Subscription;
pub use weather_snapshot::WeatherSnapshot;
