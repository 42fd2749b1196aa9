pub mod transactions;
pub mod webhook;

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub current_time: String,
}

/// `GET /` liveness check. Does not touch the store.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "HEALTHY".to_string(),
        current_time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}
