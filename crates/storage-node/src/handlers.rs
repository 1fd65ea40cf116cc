//! Storage Node HTTP handlers — `GetNodeID` / `PutChunk` / `GetChunk` /
//! `DeleteChunk`, plus a `status` endpoint for liveness.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use dfs_core::ErrorKind;
use dfs_stores::ChunkStore;

pub const CHECKSUM_HEADER: &str = "x-chunk-checksum";

#[derive(Clone)]
pub struct NodeState {
    pub node_id: String,
    pub store: Arc<ChunkStore>,
    pub started_at: Instant,
}

/// Converts a `dfs_core::DfsError` into an HTTP response: status per the
/// error taxonomy, JSON body `{"error": "..."}`.
fn error_response(err: dfs_core::DfsError) -> Response {
    let status = StatusCode::from_u16(err.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(serde_json::json!({ "error": err.message }))).into_response()
}

#[derive(Serialize)]
pub struct NodeIdResponse {
    pub node_id: String,
}

pub async fn handle_node_id(State(state): State<NodeState>) -> Json<NodeIdResponse> {
    Json(NodeIdResponse {
        node_id: state.node_id.clone(),
    })
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub async fn handle_put_chunk(
    State(state): State<NodeState>,
    Path(chunk_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let checksum = match headers.get(CHECKSUM_HEADER).and_then(|v| v.to_str().ok()) {
        Some(c) => c.to_string(),
        None => {
            return error_response(dfs_core::DfsError::invalid_argument(
                "missing checksum header",
            ))
        }
    };

    match state.store.put(&chunk_id, &body, &checksum) {
        Ok(()) => {
            tracing::info!(chunk_id, node_id = %state.node_id, "chunk stored");
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => {
            tracing::warn!(chunk_id, error = %e, "failed to store chunk");
            error_response(e)
        }
    }
}

pub async fn handle_get_chunk(
    State(state): State<NodeState>,
    Path(chunk_id): Path<String>,
) -> Response {
    match state.store.get(&chunk_id) {
        Ok((data, checksum)) => {
            let mut response = Bytes::from(data).into_response();
            if let Ok(value) = HeaderValue::from_str(&checksum) {
                response.headers_mut().insert(CHECKSUM_HEADER, value);
            }
            response
        }
        Err(e) => {
            tracing::debug!(chunk_id, error = %e, "chunk not found");
            error_response(e)
        }
    }
}

pub async fn handle_delete_chunk(
    State(state): State<NodeState>,
    Path(chunk_id): Path<String>,
) -> Response {
    match state.store.delete(&chunk_id) {
        Ok(()) => {
            tracing::info!(chunk_id, "chunk deleted");
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => {
            if e.kind != ErrorKind::NotFound {
                tracing::warn!(chunk_id, error = %e, "failed to delete chunk");
            }
            error_response(e)
        }
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub node_id: String,
    pub chunks_stored: usize,
    pub uptime_secs: u64,
}

pub async fn handle_status(State(state): State<NodeState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        node_id: state.node_id.clone(),
        chunks_stored: state.store.count(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
