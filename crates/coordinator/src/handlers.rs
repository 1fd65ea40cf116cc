//! Coordinator HTTP handlers — `Upload` / `Download` / `Delete`, plus a
//! `status` endpoint for liveness.
//!
//! The Coordinator holds no durable state of its own: every request is
//! served by fanning out to the Storage Nodes and the Metadata Service it
//! was configured with at startup.

use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use dfs_core::model::{ChunkPlacement, FileMetadata};
use dfs_core::{checksum, ids, wire, DfsError};

use crate::clients::{self, NodeHandle};
use crate::placement::select_replicas;
use crate::state::CoordinatorState;

fn error_response(err: DfsError) -> Response {
    let status = StatusCode::from_u16(err.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(serde_json::json!({ "error": err.message }))).into_response()
}

const CHECKSUM_HEADER: &str = "x-chunk-checksum";

#[derive(Serialize)]
pub struct UploadResponse {
    pub file_id: String,
}

/// `Upload`: consumes a client-streamed sequence of chunks (one multipart
/// part per chunk, the part's `file_name` carrying the uploaded file's
/// name), replicating each chunk to `replication_factor` storage nodes
/// before advancing to the next, then saving the assembled metadata record.
///
/// Aborts with an internal error the moment any `PutChunk` fails or the
/// deployment cannot satisfy the configured replication factor — no
/// partially-uploaded file is ever made visible via the metadata service.
pub async fn handle_upload(State(state): State<CoordinatorState>, mut multipart: Multipart) -> Response {
    if let Err(e) = clients::ensure_replication_satisfiable(state.nodes.len(), state.replication_factor) {
        return error_response(e);
    }

    let mut file_name: Option<String> = None;
    let mut file_id: Option<String> = None;
    let mut placements: Vec<ChunkPlacement> = Vec::new();
    let mut file_size: u64 = 0;
    let mut index: usize = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(DfsError::invalid_argument(format!("malformed upload stream: {e}")))
            }
        };

        if file_name.is_none() {
            let name = field.file_name().unwrap_or("unnamed").to_string();
            file_id = Some(ids::generate_file_id(&name));
            file_name = Some(name);
        }

        let data = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return error_response(DfsError::invalid_argument(format!("failed reading chunk body: {e}")))
            }
        };

        let chunk_id = ids::chunk_id(file_id.as_ref().unwrap(), index);
        let chunk_checksum = checksum::sha256_hex(&data);

        let replicas = match select_replicas(&state.nodes, index, state.replication_factor) {
            Ok(r) => r,
            Err(e) => return error_response(e),
        };

        for replica in &replicas {
            if let Err(e) = put_chunk(&state.http, replica, &chunk_id, &data, &chunk_checksum).await {
                tracing::warn!(chunk_id, node_id = %replica.node_id, error = %e, "chunk replication failed, aborting upload");
                return error_response(DfsError::internal(format!(
                    "failed to replicate chunk {chunk_id} to node {}: {e}",
                    replica.node_id
                )));
            }
        }

        placements.push(ChunkPlacement {
            chunk_id,
            node_ids: replicas.into_iter().map(|n| n.node_id).collect(),
        });
        file_size += data.len() as u64;
        index += 1;
    }

    let file_name = file_name.unwrap_or_else(|| "unnamed".to_string());
    let file_id = file_id.unwrap_or_else(|| ids::generate_file_id(&file_name));

    let metadata = FileMetadata::new(file_id.clone(), file_name, file_size, placements);
    if let Err(e) = save_metadata(&state.http, &state.metadata_base_url, &metadata).await {
        tracing::warn!(file_id, error = %e, "failed to save metadata after successful chunk upload");
        return error_response(e);
    }

    tracing::info!(file_id, chunks = index, file_size, "upload complete");
    Json(UploadResponse { file_id }).into_response()
}

async fn put_chunk(
    client: &reqwest::Client,
    node: &NodeHandle,
    chunk_id: &str,
    data: &Bytes,
    checksum: &str,
) -> anyhow::Result<()> {
    client
        .put(format!("{}/api/chunks/{chunk_id}", node.base_url))
        .header(CHECKSUM_HEADER, checksum)
        .body(data.clone())
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

async fn save_metadata(client: &reqwest::Client, metadata_base_url: &str, metadata: &FileMetadata) -> Result<(), DfsError> {
    client
        .post(format!("{metadata_base_url}/api/metadata"))
        .json(metadata)
        .send()
        .await
        .map_err(|e| DfsError::internal(format!("failed to save metadata: {e}")))?
        .error_for_status()
        .map_err(|e| DfsError::internal(format!("metadata service rejected save: {e}")))?;
    Ok(())
}

/// `Download`: fetches the file's metadata, then for each chunk (in order)
/// tries its recorded replicas in order until one returns data whose
/// recomputed checksum matches, and streams the result back as one
/// length-prefixed frame per chunk.
///
/// All-or-nothing: nothing is written to the response body until every
/// chunk has been fetched and verified, so a mid-file failure surfaces as a
/// clean error status rather than a truncated stream.
pub async fn handle_download(State(state): State<CoordinatorState>, Path(file_id): Path<String>) -> Response {
    let metadata = match fetch_metadata(&state.http, &state.metadata_base_url, &file_id).await {
        Ok(m) => m,
        Err(e) => return error_response(e),
    };

    let mut frames = Vec::with_capacity(metadata.chunks.len());
    for placement in &metadata.chunks {
        match fetch_verified_chunk(&state, placement).await {
            Ok(data) => frames.push(wire::encode_frame(&metadata.file_name, &data)),
            Err(e) => {
                tracing::warn!(file_id, chunk_id = %placement.chunk_id, error = %e, "chunk unavailable on every replica");
                return error_response(e);
            }
        }
    }

    tracing::info!(file_id, chunks = frames.len(), "download assembled");
    let stream = futures::stream::iter(frames.into_iter().map(Ok::<_, std::io::Error>));
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/octet-stream")
        .body(Body::from_stream(stream))
        .unwrap()
}

async fn fetch_verified_chunk(state: &CoordinatorState, placement: &ChunkPlacement) -> Result<Bytes, DfsError> {
    for node_id in &placement.node_ids {
        let Some(node) = clients::find_node(&state.nodes, node_id) else {
            continue;
        };
        let Ok(resp) = state
            .http
            .get(format!("{}/api/chunks/{}", node.base_url, placement.chunk_id))
            .send()
            .await
        else {
            continue;
        };
        if !resp.status().is_success() {
            continue;
        }
        let expected = resp
            .headers()
            .get(CHECKSUM_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let Ok(data) = resp.bytes().await else {
            continue;
        };
        if let Some(expected) = expected {
            if checksum::verify(&data, &expected) {
                return Ok(data);
            }
            tracing::warn!(node_id, chunk_id = %placement.chunk_id, "checksum mismatch, trying next replica");
        }
    }
    Err(DfsError::internal(format!(
        "chunk {} unavailable on all {} recorded replica(s)",
        placement.chunk_id,
        placement.node_ids.len()
    )))
}

async fn fetch_metadata(client: &reqwest::Client, metadata_base_url: &str, file_id: &str) -> Result<FileMetadata, DfsError> {
    let resp = client
        .get(format!("{metadata_base_url}/api/metadata/{file_id}"))
        .send()
        .await
        .map_err(|e| DfsError::transport(format!("metadata service unreachable: {e}")))?;

    if resp.status() == StatusCode::NOT_FOUND {
        return Err(DfsError::not_found(format!("file_id {file_id} not found")));
    }
    resp.error_for_status_ref()
        .map_err(|e| DfsError::internal(format!("metadata service error: {e}")))?;
    resp.json()
        .await
        .map_err(|e| DfsError::internal(format!("malformed metadata response: {e}")))
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// `Delete`: removes the chunk data on every recorded replica on a
/// best-effort basis, then the metadata record authoritatively. A replica
/// that is unreachable during this pass leaves an orphaned chunk behind —
/// accepted per the design's no-garbage-collector stance.
pub async fn handle_delete(State(state): State<CoordinatorState>, Path(file_id): Path<String>) -> Response {
    let metadata = match fetch_metadata(&state.http, &state.metadata_base_url, &file_id).await {
        Ok(m) => m,
        Err(e) => return error_response(e),
    };

    for placement in &metadata.chunks {
        for node_id in &placement.node_ids {
            let Some(node) = clients::find_node(&state.nodes, node_id) else {
                continue;
            };
            let result = state
                .http
                .delete(format!("{}/api/chunks/{}", node.base_url, placement.chunk_id))
                .send()
                .await;
            if let Err(e) = result {
                tracing::warn!(node_id, chunk_id = %placement.chunk_id, error = %e, "best-effort chunk delete failed");
            }
        }
    }

    match delete_metadata(&state.http, &state.metadata_base_url, &file_id).await {
        Ok(()) => {
            tracing::info!(file_id, "file deleted");
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn delete_metadata(client: &reqwest::Client, metadata_base_url: &str, file_id: &str) -> Result<(), DfsError> {
    let resp = client
        .delete(format!("{metadata_base_url}/api/metadata/{file_id}"))
        .send()
        .await
        .map_err(|e| DfsError::internal(format!("failed to delete metadata: {e}")))?;

    if resp.status() == StatusCode::NOT_FOUND {
        return Err(DfsError::not_found(format!("file_id {file_id} not found")));
    }
    resp.error_for_status()
        .map_err(|e| DfsError::internal(format!("metadata service rejected delete: {e}")))?;
    Ok(())
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub known_storage_nodes: usize,
    pub replication_factor: usize,
    pub uptime_secs: u64,
}

pub async fn handle_status(State(state): State<CoordinatorState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        known_storage_nodes: state.nodes.len(),
        replication_factor: state.replication_factor,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
