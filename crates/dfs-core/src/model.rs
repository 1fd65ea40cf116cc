//! Wire shapes shared between the coordinator, the metadata service, and
//! the storage node: `FileMetadata` and its embedded `ChunkPlacement`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a single chunk's replicas landed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkPlacement {
    pub chunk_id: String,
    /// Ordered, duplicate-free list of storage peer identifiers that
    /// acknowledged the write. Length equals the replication factor on a
    /// successful upload.
    pub node_ids: Vec<String>,
}

/// The record the metadata service stores per `file_id`.
///
/// Created once at successful upload completion, never mutated after,
/// destroyed on delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileMetadata {
    pub file_id: String,
    pub file_name: String,
    pub file_size: u64,
    /// Ordered; concatenating chunk data in this order reconstructs the file.
    pub chunks: Vec<ChunkPlacement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileMetadata {
    /// Build a freshly-saved record: `updated_at == created_at`.
    pub fn new(file_id: String, file_name: String, file_size: u64, chunks: Vec<ChunkPlacement>) -> Self {
        let now = Utc::now();
        Self {
            file_id,
            file_name,
            file_size,
            chunks,
            created_at: now,
            updated_at: now,
        }
    }
}
