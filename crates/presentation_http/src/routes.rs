//! Route definitions

use axum::{
    Router,
    routing::{get, put},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint (excluded from auth)
        .route("/health", get(handlers::health::health_check))
        // Subscription API (v1)
        .route(
            "/v1/subscriptions",
            get(handlers::subscriptions::list_subscriptions)
                .post(handlers::subscriptions::create_subscription),
        )
        .route(
            "/v1/subscriptions/{id}",
            put(handlers::subscriptions::edit_subscription)
                .delete(handlers::subscriptions::delete_subscription),
        )
        // Attach state
        .with_state(state)
}
