//! Handler for browser push registrations.

use axum::extract::State;
use axum::Json;
use cheddit_core::push::validate_subscription;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PushSubscribeRequest {
    #[serde(default)]
    pub subscription: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct PushSubscribeResponse {
    pub success: bool,
}

/// POST /api/push-subscribe
///
/// Store the caller's push subscription, replacing any previous one.
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<PushSubscribeRequest>,
) -> AppResult<Json<PushSubscribeResponse>> {
    validate_subscription(&input.subscription)?;

    state
        .store
        .upsert_push_subscription(user.user_id, &input.subscription)
        .await?;

    tracing::info!(user_id = %user.user_id, "Push subscription stored");

    Ok(Json(PushSubscribeResponse { success: true }))
}
