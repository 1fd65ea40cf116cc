//! `download` — reads the coordinator's framed byte stream and reassembles
//! it on disk in arrival order.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use dfs_core::wire::FrameDecoder;

use super::http::{base_url, client_with_timeout};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

pub async fn cmd_download(coordinator_addr: &str, file_id: &str, dest: Option<&str>) -> Result<()> {
    let client = client_with_timeout(DOWNLOAD_TIMEOUT)?;
    let resp = client
        .get(format!("{}/download/{file_id}", base_url(coordinator_addr)))
        .send()
        .await
        .with_context(|| format!("failed to reach coordinator at {coordinator_addr} — is it running?"))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("coordinator rejected download ({status}): {body}");
    }

    let mut decoder = FrameDecoder::new();
    let mut stream = resp.bytes_stream();
    let mut out: Option<tokio::fs::File> = None;
    let mut frame_count = 0usize;
    let mut total_bytes = 0u64;
    let mut out_path = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("error reading download stream")?;
        decoder.push(&chunk);

        while let Some((name, data)) = decoder.next_frame() {
            if out.is_none() {
                out_path = dest.map(str::to_string).unwrap_or_else(|| name.clone());
                out = Some(
                    tokio::fs::File::create(&out_path)
                        .await
                        .with_context(|| format!("failed to create output file: {out_path}"))?,
                );
            }
            let file = out.as_mut().expect("output file opened above");
            file.write_all(&data).await.context("failed writing downloaded data")?;
            frame_count += 1;
            total_bytes += data.len() as u64;
        }
    }

    if let Some(mut file) = out {
        file.flush().await.ok();
        println!("Downloaded {file_id} -> {out_path}");
        println!("  chunks: {frame_count}, bytes: {total_bytes}");
    } else {
        // Zero-chunk file: still materialize an empty file at the destination.
        let out_path = dest.map(str::to_string).unwrap_or_else(|| file_id.to_string());
        tokio::fs::File::create(&out_path)
            .await
            .with_context(|| format!("failed to create output file: {out_path}"))?;
        println!("Downloaded {file_id} -> {out_path} (empty file)");
    }

    Ok(())
}
