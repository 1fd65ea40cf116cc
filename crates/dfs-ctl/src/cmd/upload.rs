//! `upload` — splits a local file into fixed-size chunks and streams them
//! to the coordinator as one multipart part per chunk.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::http::{base_url, client_with_timeout};

/// Matches the reference deployment's chunk size.
const CHUNK_SIZE: usize = 64 * 1024;
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Deserialize)]
struct UploadResponse {
    file_id: String,
}

pub async fn cmd_upload(coordinator_addr: &str, path: &str) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("failed to read file: {path}"))?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    // `chunks()` on an empty slice iterates zero times, which would send
    // zero multipart parts and never give the coordinator a chance to learn
    // the real basename (`handle_upload` only captures `file_name` off the
    // first part it sees). Send one empty-bodied part so a zero-byte file
    // still carries its real name.
    let mut form = reqwest::multipart::Form::new();
    if data.is_empty() {
        let part = reqwest::multipart::Part::bytes(Vec::new()).file_name(file_name.clone());
        form = form.part("chunk", part);
    } else {
        for chunk in data.chunks(CHUNK_SIZE) {
            let part = reqwest::multipart::Part::bytes(chunk.to_vec()).file_name(file_name.clone());
            form = form.part("chunk", part);
        }
    }

    let client = client_with_timeout(UPLOAD_TIMEOUT)?;
    let resp: UploadResponse = client
        .post(format!("{}/upload", base_url(coordinator_addr)))
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("failed to reach coordinator at {coordinator_addr} — is it running?"))?
        .error_for_status()
        .context("coordinator rejected upload")?
        .json()
        .await
        .context("failed to parse upload response")?;

    println!("Uploaded {file_name} ({} bytes)", data.len());
    println!("  file_id: {}", resp.file_id);
    Ok(())
}
