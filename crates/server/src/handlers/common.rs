//! Shared handler helpers and the health endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shelfmark_metadata::models::BookRow;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check (intentionally unauthenticated for load balancer probes).
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.metadata.health_check().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// Read and decode a JSON request body, bounded by the configured limit.
pub async fn read_json_body<T: DeserializeOwned>(state: &AppState, req: Request) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), state.config.server.max_body_size)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Decode the stored JSON authors column into a list of names.
pub fn decode_authors(row: &BookRow) -> Vec<String> {
    row.authors
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}
