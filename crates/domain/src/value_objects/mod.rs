//! Value Objects - Immutable, identity-less domain primitives

mod city_id;
mod city_key;
mod country_code;
mod email_address;
mod frequency_unit;
mod subscription_id;
mod user_id;
mod weather_reading;

pub use city_id::CityId;
pub use city_key::CityKey;
pub use country_code::CountryCode;
pub use email_address::EmailAddress;
pub use frequency_unit::FrequencyUnit;
pub use subscription_id::SubscriptionId;
pub use user_id::UserId;
pub use weather_reading::WeatherReading;
