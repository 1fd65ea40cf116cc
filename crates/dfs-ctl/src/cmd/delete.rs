//! `delete` — removes a file's chunks and metadata record.

use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use super::http::{base_url, client_with_timeout, delete_json};

const DELETE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct DeleteResponse {
    success: bool,
}

pub async fn cmd_delete(coordinator_addr: &str, file_id: &str) -> Result<()> {
    let client = client_with_timeout(DELETE_TIMEOUT)?;
    let resp: DeleteResponse =
        delete_json(&client, &format!("{}/files/{file_id}", base_url(coordinator_addr))).await?;

    if resp.success {
        println!("Deleted {file_id}");
    } else {
        println!("Delete reported failure for {file_id}");
    }
    Ok(())
}
