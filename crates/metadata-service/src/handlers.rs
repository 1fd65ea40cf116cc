//! Metadata Service HTTP handlers — `Save` / `Get` / `Delete FileMetadata`,
//! plus a `status` endpoint for liveness.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use dfs_core::model::FileMetadata;
use dfs_stores::MetadataStore;

#[derive(Clone)]
pub struct ServiceState {
    pub store: Arc<MetadataStore>,
    pub started_at: Instant,
}

fn error_response(err: dfs_core::DfsError) -> Response {
    let status = StatusCode::from_u16(err.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(serde_json::json!({ "error": err.message }))).into_response()
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub async fn handle_save(State(state): State<ServiceState>, Json(metadata): Json<FileMetadata>) -> Response {
    match state.store.save(&metadata).await {
        Ok(()) => {
            tracing::info!(file_id = %metadata.file_id, "metadata saved");
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => {
            tracing::warn!(file_id = %metadata.file_id, error = %e, "failed to save metadata");
            error_response(e)
        }
    }
}

pub async fn handle_get(State(state): State<ServiceState>, Path(file_id): Path<String>) -> Response {
    match state.store.get(&file_id).await {
        Ok(metadata) => Json(metadata).into_response(),
        Err(e) => {
            tracing::debug!(file_id, error = %e, "metadata not found");
            error_response(e)
        }
    }
}

pub async fn handle_delete(State(state): State<ServiceState>, Path(file_id): Path<String>) -> Response {
    match state.store.delete(&file_id).await {
        Ok(()) => {
            tracing::info!(file_id, "metadata deleted");
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => {
            tracing::debug!(file_id, error = %e, "failed to delete metadata");
            error_response(e)
        }
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub records_stored: usize,
    pub uptime_secs: u64,
}

pub async fn handle_status(State(state): State<ServiceState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        records_stored: state.store.count().await,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
