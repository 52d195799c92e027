//! API error handling
//!
//! Maps application errors onto HTTP responses. Every error body is a
//! single `{"error": "..."}` object; messages that come from the
//! upstream weather provider are passed through verbatim, internal
//! errors are replaced with a generic message.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejection forwarded from the weather provider; the upstream
    /// status code and message reach the caller unchanged
    #[error("{message}")]
    Upstream { code: u16, message: String },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Upstream { code, message } => (
                StatusCode::from_u16(code).unwrap_or(StatusCode::NOT_FOUND),
                message,
            ),
            Self::ServiceUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            },
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::CityNotFound { code, message } => Self::Upstream { code, message },
            ApplicationError::DuplicateSubscription => Self::BadRequest(err.to_string()),
            ApplicationError::NotFoundForUser(_) => Self::NotFound(err.to_string()),
            ApplicationError::ExternalService(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_rejection_keeps_upstream_code() {
        let source = ApplicationError::CityNotFound {
            code: 404,
            message: "city not found".to_string(),
        };
        let err: ApiError = source.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unexpected_upstream_code_falls_back_to_not_found() {
        let err = ApiError::Upstream {
            code: 0,
            message: "odd".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_subscription_is_bad_request_with_exact_message() {
        let err: ApiError = ApplicationError::DuplicateSubscription.into();
        let ApiError::BadRequest(msg) = &err else {
            unreachable!("Expected BadRequest");
        };
        assert_eq!(
            msg,
            "You are already subscribed to this city. Please, edit an existing subscription"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_subscription_names_the_id() {
        let err: ApiError = ApplicationError::NotFoundForUser(7).into();
        let ApiError::NotFound(msg) = &err else {
            unreachable!("Expected NotFound");
        };
        assert_eq!(msg, "Subscription with id=7 does not exist for this user");
    }

    #[test]
    fn validation_error_is_bad_request() {
        let source = ApplicationError::Domain(domain::DomainError::validation("bad frequency"));
        let err: ApiError = source.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn external_service_maps_to_bad_gateway() {
        let err: ApiError = ApplicationError::ExternalService("provider down".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_error_hides_details() {
        let err: ApiError = ApplicationError::Internal("db exploded".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_serialization() {
        let resp = ErrorResponse {
            error: "city not found".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"city not found"}"#);
    }
}
