//! Metadata Store — persists `(file_id -> FileMetadata)` as one JSON
//! document per file, in a flat directory.
//!
//! A single readers-writer lock guards the document directory: writes are
//! exclusive, reads are concurrent. This protects document integrity, not
//! logical-file semantics — two concurrent uploads of the same file name
//! still produce two independent `file_id`s and two independent documents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use dfs_core::model::FileMetadata;
use dfs_core::{DfsError, ErrorKind};
use tokio::sync::RwLock;

pub struct MetadataStore {
    base_dir: PathBuf,
    lock: RwLock<()>,
}

impl MetadataStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            lock: RwLock::new(()),
        })
    }

    fn doc_path(&self, file_id: &str) -> PathBuf {
        self.base_dir.join(format!("{file_id}.json"))
    }

    /// Create-or-replace the document for `metadata.file_id`.
    ///
    /// `created_at` is stamped on first save; on replace, the existing
    /// document's `created_at` is preserved and `updated_at` is refreshed
    /// to `metadata.updated_at`. The coordinator never replaces an
    /// existing `file_id` in practice (each upload mints a fresh one), but
    /// this keeps the service's own contract honest independent of that.
    pub async fn save(&self, metadata: &FileMetadata) -> Result<(), DfsError> {
        let _guard = self.lock.write().await;
        let path = self.doc_path(&metadata.file_id);
        let mut metadata = metadata.clone();
        if let Ok(existing) = fs::read(&path) {
            if let Ok(existing) = serde_json::from_slice::<FileMetadata>(&existing) {
                metadata.created_at = existing.created_at;
            }
        }
        let json = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| DfsError::internal(format!("failed to serialize metadata: {e}")))?;
        write_atomic(&path, &json)
            .map_err(|e| DfsError::internal(format!("failed to write metadata: {e}")))?;
        tracing::debug!(file_id = %metadata.file_id, "metadata saved");
        Ok(())
    }

    /// Fetch the document for `file_id`.
    pub async fn get(&self, file_id: &str) -> Result<FileMetadata, DfsError> {
        let _guard = self.lock.read().await;
        let bytes = fs::read(self.doc_path(file_id))
            .map_err(|_| DfsError::not_found(format!("file_id {file_id} not found")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DfsError::internal(format!("corrupt metadata for {file_id}: {e}")))
    }

    /// Remove the document for `file_id`. Fails if absent.
    pub async fn delete(&self, file_id: &str) -> Result<(), DfsError> {
        let _guard = self.lock.write().await;
        fs::remove_file(self.doc_path(file_id))
            .map_err(|_| DfsError::not_found(format!("file_id {file_id} not found")))?;
        tracing::debug!(file_id, "metadata deleted");
        Ok(())
    }

    /// Number of metadata documents currently stored (for the status endpoint).
    pub async fn count(&self) -> usize {
        let _guard = self.lock.read().await;
        fs::read_dir(&self.base_dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or(0)
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)
}
