//! Subscription handlers
//!
//! CRUD surface over the subscription service. The caller identity
//! comes from the auth middleware; a subscription is only ever visible
//! to the user who owns it.

use application::services::SubscriptionView;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use domain::CityKey;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{error::ApiError, middleware::AuthenticatedUser, state::AppState};

/// City fields as they appear on the wire; `state` maps to the
/// optional region of the city identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CityPayload {
    pub name: String,
    #[serde(default)]
    pub state: String,
    pub country_code: String,
}

impl CityPayload {
    fn into_key(self) -> Result<CityKey, ApiError> {
        CityKey::new(self.name, self.state, self.country_code)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Request body for creating a subscription
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub city: CityPayload,
    pub notification_frequency: u32,
}

/// Request body for editing a subscription; a missing frequency keeps
/// the current one
#[derive(Debug, Deserialize)]
pub struct EditSubscriptionRequest {
    pub city: CityPayload,
    #[serde(default)]
    pub notification_frequency: Option<u32>,
}

/// POST /v1/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let key = request.city.into_key()?;
    state
        .subscriptions
        .create(user.user_id, key, request.notification_frequency)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"res": "New subscription created successfully"})),
    ))
}

/// GET /v1/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<SubscriptionView>>, ApiError> {
    let views = state.subscriptions.list(user.user_id).await?;
    Ok(Json(views))
}

/// PUT /v1/subscriptions/{id}
pub async fn edit_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(request): Json<EditSubscriptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let key = request.city.into_key()?;
    state
        .subscriptions
        .edit(
            user.user_id,
            id.into(),
            key,
            request.notification_frequency,
        )
        .await?;

    Ok(Json(json!({"res": "Subscription edited"})))
}

/// DELETE /v1/subscriptions/{id}
pub async fn delete_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.subscriptions.delete(user.user_id, id.into()).await?;

    Ok(Json(json!({"res": "Subscription deleted"})))
}
