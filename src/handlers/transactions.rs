use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::AppState;

/// `GET /v1/transactions/:transaction_id`.
///
/// Returns a one-element array for callers that expect a collection. The read
/// is not synchronized with an in-flight completion.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.store.find(&transaction_id).await?.ok_or_else(|| {
        tracing::debug!(transaction_id = %transaction_id, "Transaction lookup missed");
        AppError::NotFound(format!("Transaction {} not found", transaction_id))
    })?;

    Ok(Json(vec![record]))
}
