//! Application state shared across handlers

use std::sync::Arc;

use application::services::SubscriptionService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Subscription lifecycle service
    pub subscriptions: Arc<SubscriptionService>,
}
