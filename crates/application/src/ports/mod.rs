//! Port definitions - Interfaces to infrastructure and collaborators

mod city_registry;
mod mail_port;
mod snapshot_store;
mod subscription_ledger;
mod user_directory;
mod weather_lookup;

pub use city_registry::CityRegistry;
pub use mail_port::{MailError, MailMessage, MailPort};
pub use snapshot_store::SnapshotStore;
pub use subscription_ledger::SubscriptionLedger;
pub use user_directory::UserDirectory;
pub use weather_lookup::{WeatherLookupError, WeatherLookupPort};

#[cfg(test)]
pub use city_registry::MockCityRegistry;
#[cfg(test)]
pub use mail_port::MockMailPort;
#[cfg(test)]
pub use snapshot_store::MockSnapshotStore;
#[cfg(test)]
pub use subscription_ledger::MockSubscriptionLedger;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
#[cfg(test)]
pub use weather_lookup::MockWeatherLookupPort;
