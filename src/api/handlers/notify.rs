//! Webhook endpoint receiving notifications from Moodle.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    routing::post,
};
use validator::Validate;

use crate::api::dto::StatusResponse;
use crate::error::{AppError, AppResult};
use crate::models::Notification;
use crate::state::AppState;
use crate::utils::verify_secret;

/// `POST /notify`, nested under `/api/v1`
pub fn notify_routes() -> Router<AppState> {
    Router::new().route("/notify", post(notify))
}

/// Receives a notification and delivers it as a direct message.
///
/// The shared secret comes from the `secret` query parameter; when it is
/// repeated the first occurrence wins, when absent it is empty.
///
/// # Responses
/// - `200 OK` with `{"status":"OK"}`
/// - `403 Forbidden` when the secret does not match
/// - `400 Bad Request` when the body cannot be decoded or is incomplete
/// - `500 Internal Server Error` when the chat platform call fails
pub async fn notify(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> AppResult<Json<StatusResponse>> {
    let supplied = params
        .iter()
        .find(|(key, _)| key == "secret")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();

    let config = state.config.current();
    if let Err(err) = verify_secret(&config.secret, supplied) {
        tracing::warn!(config_version = config.version, "Rejected notification with a bad secret");
        return Err(err);
    }

    let notification = Notification::from_json(&body).map_err(|e| {
        tracing::warn!(error = %e, "Could not decode notification body");
        AppError::BadRequest {
            message: "Could not decode request body".to_string(),
        }
    })?;

    notification.validate().map_err(|e| {
        tracing::warn!(error = %e, "Notification failed validation");
        AppError::BadRequest {
            message: "Invalid request body".to_string(),
        }
    })?;

    match state.services.notify.notify(&notification).await {
        Ok(post) => {
            tracing::info!(post_id = %post.id, "Notification delivered");
            Ok(Json(StatusResponse::ok()))
        }
        Err(err) => {
            tracing::error!(error = %err, "Notification delivery failed");
            Err(err)
        }
    }
}
