//! Nimbus HTTP presentation layer
//!
//! This crate provides the HTTP API for the weather subscription
//! service.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::ApiError;
pub use middleware::{ApiKeyAuthLayer, AuthenticatedUser};
pub use routes::create_router;
pub use state::AppState;
