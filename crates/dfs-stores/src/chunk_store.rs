//! Chunk Store — persists `(chunk_id -> bytes, checksum)` on the local
//! filesystem as one data file plus a `.checksum` sidecar per chunk, in a
//! flat directory.
//!
//! The store performs no verification of its own: the checksum it hands
//! back on `get` is whatever was recorded at `put` time, unexamined. The
//! coordinator recomputes and compares; the store is a dumb blob holder
//! on purpose (checksum policy is centralized above it).
//!
//! Writes go through a temp-file-then-rename so a reader never observes
//! a partially-written chunk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dfs_core::{DfsError, ErrorKind};

#[derive(Clone)]
pub struct ChunkStore {
    base_dir: PathBuf,
}

impl ChunkStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("failed to create chunk store dir: {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    fn data_path(&self, chunk_id: &str) -> PathBuf {
        self.base_dir.join(chunk_id)
    }

    fn checksum_path(&self, chunk_id: &str) -> PathBuf {
        self.base_dir.join(format!("{chunk_id}.checksum"))
    }

    /// Store `data` and its `checksum`. Overwrites on duplicate `chunk_id`.
    pub fn put(&self, chunk_id: &str, data: &[u8], checksum: &str) -> Result<(), DfsError> {
        write_atomic(&self.data_path(chunk_id), data)
            .map_err(|e| DfsError::internal(format!("failed to write chunk {chunk_id}: {e}")))?;
        write_atomic(&self.checksum_path(chunk_id), checksum.as_bytes())
            .map_err(|e| DfsError::internal(format!("failed to write checksum for {chunk_id}: {e}")))?;
        tracing::debug!(chunk_id, bytes = data.len(), "chunk stored");
        Ok(())
    }

    /// Retrieve the bytes and recorded checksum for `chunk_id`.
    ///
    /// Fails with `NotFound` if either the chunk or its sidecar checksum
    /// is missing. The checksum is *not* verified here — that is the
    /// coordinator's responsibility.
    pub fn get(&self, chunk_id: &str) -> Result<(Vec<u8>, String), DfsError> {
        let data = fs::read(self.data_path(chunk_id))
            .map_err(|_| DfsError::not_found(format!("chunk {chunk_id} not found")))?;
        let checksum = fs::read_to_string(self.checksum_path(chunk_id))
            .map_err(|_| DfsError::not_found(format!("checksum for chunk {chunk_id} not found")))?;
        Ok((data, checksum))
    }

    /// Remove the chunk and its checksum sidecar.
    ///
    /// Fails if either is missing. A retry after a partial delete (one of
    /// the two files already gone) is not guaranteed to succeed.
    pub fn delete(&self, chunk_id: &str) -> Result<(), DfsError> {
        fs::remove_file(self.data_path(chunk_id))
            .map_err(|_| DfsError::not_found(format!("chunk {chunk_id} not found")))?;
        fs::remove_file(self.checksum_path(chunk_id))
            .map_err(|_| DfsError::not_found(format!("checksum for chunk {chunk_id} not found")))?;
        tracing::debug!(chunk_id, "chunk deleted");
        Ok(())
    }

    /// Number of chunks currently stored (for the status endpoint).
    pub fn count(&self) -> usize {
        fs::read_dir(&self.base_dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| {
                        e.file_name()
                            .to_str()
                            .is_some_and(|n| !n.ends_with(".checksum"))
                    })
                    .count()
            })
            .unwrap_or(0)
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)
}
