//! Shared HTTP request helpers for CLI commands.

use std::time::Duration;

use anyhow::{Context, Result};

pub fn base_url(coordinator_addr: &str) -> String {
    format!("http://{coordinator_addr}/api")
}

/// Build a client with the timeout appropriate to the command being run —
/// Upload and Download hold the connection open for as long as the
/// transfer takes; Delete does not.
pub fn client_with_timeout(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}

pub async fn delete_json<T: for<'de> serde::Deserialize<'de>>(client: &reqwest::Client, url: &str) -> Result<T> {
    client
        .delete(url)
        .send()
        .await
        .with_context(|| format!("failed to reach coordinator at {url} — is it running?"))?
        .error_for_status()
        .with_context(|| format!("coordinator rejected request to {url}"))?
        .json::<T>()
        .await
        .context("failed to parse response")
}
