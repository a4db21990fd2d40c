//! Liveness probe.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`. 503 when the database does not answer.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    if !state.db.health_check().await {
        return Err(ApiError::Unavailable);
    }

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
