use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::WebhookPayload;
use crate::AppState;

pub const ACCEPTED_MESSAGE: &str = "Accepted";

#[derive(Debug, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

/// `POST /v1/webhooks/transactions`. Answers 202 for new and duplicate
/// deliveries alike.
pub async fn receive_transaction(
    State(state): State<AppState>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    state.ingest.ingest(payload).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(Acknowledgement {
            message: ACCEPTED_MESSAGE.to_string(),
        }),
    ))
}
