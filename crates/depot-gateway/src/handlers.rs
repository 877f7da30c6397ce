//! HTTP handlers for the fetch and health endpoints

use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;

/// Body of `POST /fetch`
#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    /// Bucket to list
    pub bucket: String,
    /// Channel to list; empty selects every resource in the bucket
    #[serde(default)]
    pub channel: String,
}

/// POST /fetch - Return the manifest for a bucket or channel
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: FetchRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let manifest = state
        .store
        .manifest(&request.bucket, &request.channel)
        .await?;

    Ok((
        StatusCode::OK,
        [("Content-Type", "application/json")],
        manifest,
    )
        .into_response())
}

/// GET /health - Liveness probe
pub async fn health() -> Response {
    StatusCode::OK.into_response()
}
