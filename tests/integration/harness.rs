//! Spins up a full cluster — N storage nodes, one metadata service, one
//! coordinator — as real child processes on ephemeral ports, the way a
//! deployed system actually runs.

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use serde::Deserialize;

use dfs_core::wire::FrameDecoder;

pub struct TestCluster {
    pub coordinator_addr: String,
    /// `temp_dirs[0]` is the metadata service's directory; the rest are the
    /// storage nodes' chunk directories, in the order they were started.
    temp_dirs: Vec<tempfile::TempDir>,
    pub children: Vec<Child>,
    client: reqwest::Client,
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("failed to bind ephemeral port")
        .local_addr()
        .unwrap()
        .port()
}

async fn wait_for_status(addr: &str, attempts: u32) -> Result<()> {
    let client = reqwest::Client::new();
    for attempt in 1..=attempts {
        if let Ok(resp) = client.get(format!("http://{addr}/api/status")).send().await {
            if resp.status().is_success() {
                return Ok(());
            }
        }
        if attempt < attempts {
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
    }
    bail!("service at {addr} did not become ready")
}

impl TestCluster {
    /// Start `node_count` storage nodes and one coordinator configured
    /// with `replication_factor`, waiting until every service answers its
    /// status endpoint.
    pub async fn start(node_count: usize, replication_factor: usize) -> Result<Self> {
        let mut children = Vec::new();
        let mut temp_dirs = Vec::new();

        let metadata_port = free_port();
        let metadata_dir = tempfile::Builder::new().prefix("dfs-metadata").tempdir()?;
        children.push(
            Command::new(env!("CARGO_BIN_EXE_metadata-service"))
                .env("DFS_METADATA_PORT", metadata_port.to_string())
                .env("DFS_METADATA_DIR", metadata_dir.path())
                .env("RUST_LOG", "warn")
                .spawn()?,
        );
        let metadata_addr = format!("127.0.0.1:{metadata_port}");
        temp_dirs.push(metadata_dir);

        let mut storage_addrs = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            let port = free_port();
            let dir = tempfile::Builder::new().prefix("dfs-storage").tempdir()?;
            children.push(
                Command::new(env!("CARGO_BIN_EXE_storage-node"))
                    .env("DFS_STORAGE_PORT", port.to_string())
                    .env("DFS_STORAGE_DIR", dir.path())
                    .env("RUST_LOG", "warn")
                    .spawn()?,
            );
            storage_addrs.push(format!("127.0.0.1:{port}"));
            temp_dirs.push(dir);
        }

        for addr in std::iter::once(&metadata_addr).chain(storage_addrs.iter()) {
            wait_for_status(addr, 40).await?;
        }

        let coordinator_port = free_port();
        children.push(
            Command::new(env!("CARGO_BIN_EXE_coordinator"))
                .env("DFS_COORDINATOR_PORT", coordinator_port.to_string())
                .env("DFS_METADATA_ADDR", &metadata_addr)
                .env("DFS_STORAGE_ADDRS", storage_addrs.join(","))
                .env("DFS_REPLICATION_FACTOR", replication_factor.to_string())
                .env("RUST_LOG", "warn")
                .spawn()?,
        );
        let coordinator_addr = format!("127.0.0.1:{coordinator_port}");
        wait_for_status(&coordinator_addr, 40).await?;

        Ok(Self {
            coordinator_addr,
            temp_dirs,
            children,
            client: reqwest::Client::new(),
        })
    }

    fn base_url(&self) -> String {
        format!("http://{}/api", self.coordinator_addr)
    }

    /// Chunk directories for each storage node, in startup order.
    pub fn storage_dirs(&self) -> Vec<&Path> {
        self.temp_dirs[1..].iter().map(|d| d.path()).collect()
    }

    /// Upload `frames` — each element becomes one multipart chunk — under
    /// `file_name`, returning the assigned `file_id`.
    pub async fn upload(&self, file_name: &str, frames: &[&[u8]]) -> Result<String> {
        #[derive(Deserialize)]
        struct UploadResponse {
            file_id: String,
        }

        let mut form = reqwest::multipart::Form::new();
        for frame in frames {
            let part = reqwest::multipart::Part::bytes(frame.to_vec()).file_name(file_name.to_string());
            form = form.part("chunk", part);
        }

        let resp = self
            .client
            .post(format!("{}/upload", self.base_url()))
            .multipart(form)
            .send()
            .await
            .context("failed to reach coordinator")?;

        if !resp.status().is_success() {
            bail!("upload rejected: {} {}", resp.status(), resp.text().await.unwrap_or_default());
        }
        Ok(resp.json::<UploadResponse>().await?.file_id)
    }

    /// Download `file_id`, returning the reassembled bytes, or the HTTP
    /// status code on failure.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, u16> {
        self.download_with_name(file_id).await.map(|(_, data)| data)
    }

    /// Download `file_id`, returning the `file_name` carried on each frame
    /// alongside the reassembled bytes, or the HTTP status code on failure.
    /// `file_name` is `None` only if the response carried zero frames.
    pub async fn download_with_name(&self, file_id: &str) -> Result<(Option<String>, Vec<u8>), u16> {
        let resp = self
            .client
            .get(format!("{}/download/{file_id}", self.base_url()))
            .send()
            .await
            .map_err(|_| 0u16)?;
        if !resp.status().is_success() {
            return Err(resp.status().as_u16());
        }
        let mut decoder = FrameDecoder::new();
        let mut stream = resp.bytes_stream();
        let mut out = Vec::new();
        let mut file_name = None;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|_| 0u16)?;
            decoder.push(&chunk);
            while let Some((name, data)) = decoder.next_frame() {
                file_name.get_or_insert(name);
                out.extend_from_slice(&data);
            }
        }
        Ok((file_name, out))
    }

    /// Delete `file_id`, returning the HTTP status code.
    pub async fn delete(&self, file_id: &str) -> u16 {
        self.client
            .delete(format!("{}/files/{file_id}", self.base_url()))
            .send()
            .await
            .map(|r| r.status().as_u16())
            .unwrap_or(0)
    }
}

/// Flip the first byte of every on-disk chunk data file in `dir` (skipping
/// `.checksum` sidecars), so the next `GetChunk` from that replica returns
/// bytes that fail the coordinator's checksum verification.
pub fn corrupt_all_chunks_in(dir: &Path) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path: PathBuf = entry.path();
        if path.extension().is_some_and(|ext| ext == "checksum") || path.extension().is_some_and(|ext| ext == "tmp") {
            continue;
        }
        if !path.is_file() {
            continue;
        }
        let mut data = std::fs::read(&path)?;
        if data.is_empty() {
            continue;
        }
        data[0] ^= 0xFF;
        std::fs::write(&path, data)?;
    }
    Ok(())
}

impl Drop for TestCluster {
    fn drop(&mut self) {
        for child in &mut self.children {
            child.kill().ok();
            child.wait().ok();
        }
    }
}
