//! Application services

mod notification_service;
mod refresh_service;
mod subscription_service;

pub use notification_service::{NotificationOutcome, NotificationService};
pub use refresh_service::{RefreshOutcome, RefreshService};
pub use subscription_service::{CityView, SubscriptionService, SubscriptionView};
