//! Identifier scheme — file IDs and chunk IDs.
//!
//! `file_id` is derived once, at upload start, from the file name salted
//! with the current wall-clock instant; collisions are accepted as
//! negligible at the target scale (no uniqueness check is performed).
//! `chunk_id` is deterministic in `(file_id, chunk_index)` so replicas for
//! the same logical slot collide by design.

use sha2::{Digest, Sha256};

/// Generate a new file identifier: the first 8 bytes of
/// `SHA-256(file_name || current wall-clock string)`, hex-encoded (16 chars).
pub fn generate_file_id(file_name: &str) -> String {
    let now = chrono::Utc::now().to_rfc3339();
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(now.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Derive the chunk ID for the `index`-th chunk of `file_id`.
pub fn chunk_id(file_id: &str, index: usize) -> String {
    format!("{file_id}-chunk-{index}")
}
