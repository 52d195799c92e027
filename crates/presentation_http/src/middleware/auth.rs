//! API key authentication middleware
//!
//! Validates the `X-Api-Key` header against configured keys using
//! constant-time comparison, and attaches the authenticated user's id
//! to the request. The health endpoint is excluded.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use domain::UserId;
use infrastructure::config::ApiKeyEntry;
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Header carrying the API key
pub const X_API_KEY: &str = "x-api-key";

/// The authenticated caller, injected into request extensions
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser {
    /// The user the presented key belongs to
    pub user_id: UserId,
}

/// A configured key with its parsed user id
#[derive(Clone, Debug)]
struct VerifiedKeyEntry {
    key: String,
    user_id: UserId,
}

/// Storage for API key entries
#[derive(Clone, Debug, Default)]
struct ApiKeyStore {
    entries: Vec<VerifiedKeyEntry>,
}

impl ApiKeyStore {
    /// Build from configuration, skipping entries with malformed ids
    fn from_entries(entries: &[ApiKeyEntry]) -> Self {
        let entries = entries
            .iter()
            .filter_map(|entry| match UserId::parse(&entry.user_id) {
                Ok(user_id) => Some(VerifiedKeyEntry {
                    key: entry.key.clone(),
                    user_id,
                }),
                Err(e) => {
                    warn!(
                        user_id = %entry.user_id,
                        error = %e,
                        "Invalid user ID format in auth.api_keys, skipping entry"
                    );
                    None
                },
            })
            .collect();

        Self { entries }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify a presented key, comparing every entry in constant time
    fn verify(&self, presented: &str) -> Option<UserId> {
        let mut matched = None;
        for entry in &self.entries {
            if entry.key.as_bytes().ct_eq(presented.as_bytes()).into() {
                matched = Some(entry.user_id);
            }
        }
        if matched.is_some() {
            debug!("API key verified successfully");
        }
        matched
    }
}

/// Layer that applies API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuthLayer {
    api_key_store: Arc<ApiKeyStore>,
    excluded_paths: Vec<String>,
}

impl ApiKeyAuthLayer {
    /// Create a layer from configured API key entries
    #[must_use]
    pub fn from_api_keys(entries: &[ApiKeyEntry]) -> Self {
        Self {
            api_key_store: Arc::new(ApiKeyStore::from_entries(entries)),
            excluded_paths: vec!["/health".to_string()],
        }
    }

    /// Create a layer with authentication disabled
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            api_key_store: Arc::new(ApiKeyStore::default()),
            excluded_paths: vec!["/health".to_string()],
        }
    }
}

impl<S> Layer<S> for ApiKeyAuthLayer {
    type Service = ApiKeyAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuth {
            inner,
            api_key_store: Arc::clone(&self.api_key_store),
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Middleware service for API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuth<S> {
    inner: S,
    api_key_store: Arc<ApiKeyStore>,
    excluded_paths: Vec<String>,
}

impl<S> Service<Request> for ApiKeyAuth<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let api_key_store = Arc::clone(&self.api_key_store);
        let excluded_paths = self.excluded_paths.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // Check if path is excluded from auth
            let path = req.uri().path();
            if excluded_paths.iter().any(|p| path.starts_with(p)) {
                return inner.call(req).await;
            }

            // If no API keys configured, auth is disabled; every
            // request acts as the one fixed anonymous user
            if api_key_store.is_empty() {
                req.extensions_mut().insert(AuthenticatedUser {
                    user_id: UserId::anonymous(),
                });
                return inner.call(req).await;
            }

            let presented = req
                .headers()
                .get(X_API_KEY)
                .and_then(|v| v.to_str().ok());

            match presented {
                Some(key) => {
                    if let Some(user_id) = api_key_store.verify(key) {
                        req.extensions_mut().insert(AuthenticatedUser { user_id });
                        return inner.call(req).await;
                    }
                    Ok(unauthorized_response("Invalid API key"))
                },
                None => Ok(unauthorized_response("Missing X-Api-Key header")),
            }
        })
    }
}

fn unauthorized_response(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn test_handler() -> &'static str {
        "ok"
    }

    /// Handler that echoes the authenticated user id
    async fn user_id_handler(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.user_id.to_string()
    }

    fn entry(key: &str, user_id: &str) -> ApiKeyEntry {
        ApiKeyEntry {
            key: key.to_string(),
            user_id: user_id.to_string(),
            email: "user@example.com".to_string(),
        }
    }

    fn create_test_router(entries: &[ApiKeyEntry]) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .route("/user", get(user_id_handler))
            .route("/health", get(test_handler))
            .layer(ApiKeyAuthLayer::from_api_keys(entries))
    }

    #[tokio::test]
    async fn auth_disabled_when_no_keys_configured() {
        let app = Router::new()
            .route("/test", get(test_handler))
            .layer(ApiKeyAuthLayer::disabled());

        let response = app
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn disabled_auth_uses_the_same_user_for_every_request() {
        let app = Router::new()
            .route("/user", get(user_id_handler))
            .layer(ApiKeyAuthLayer::disabled());

        let mut seen = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(Request::builder().uri("/user").body(Body::empty()).unwrap())
                .await
                .unwrap();
            let body = axum::body::to_bytes(response.into_body(), 1024)
                .await
                .unwrap();
            seen.push(String::from_utf8_lossy(&body).into_owned());
        }

        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[0], UserId::anonymous().to_string());
    }

    #[tokio::test]
    async fn valid_key_passes() {
        let entries = [entry("secret-key", "550e8400-e29b-41d4-a716-446655440001")];
        let app = create_test_router(&entries);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/test")
                    .header(X_API_KEY, "secret-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_key_rejected() {
        let entries = [entry("secret-key", "550e8400-e29b-41d4-a716-446655440001")];
        let app = create_test_router(&entries);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/test")
                    .header(X_API_KEY, "wrong-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_header_rejected() {
        let entries = [entry("secret-key", "550e8400-e29b-41d4-a716-446655440001")];
        let app = create_test_router(&entries);

        let response = app
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_endpoint_excluded_from_auth() {
        let entries = [entry("secret-key", "550e8400-e29b-41d4-a716-446655440001")];
        let app = create_test_router(&entries);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn each_key_maps_to_its_own_user() {
        let entries = [
            entry("sk-user1", "550e8400-e29b-41d4-a716-446655440001"),
            entry("sk-user2", "550e8400-e29b-41d4-a716-446655440002"),
        ];
        let app = create_test_router(&entries);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/user")
                    .header(X_API_KEY, "sk-user1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&body),
            "550e8400-e29b-41d4-a716-446655440001"
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/user")
                    .header(X_API_KEY, "sk-user2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&body),
            "550e8400-e29b-41d4-a716-446655440002"
        );
    }

    #[tokio::test]
    async fn malformed_user_id_entries_are_skipped() {
        let entries = [entry("sk-test", "not-a-valid-uuid")];
        let store = ApiKeyStore::from_entries(&entries);
        assert!(store.is_empty());
    }
}
