//! Storage Node discovery — resolved once at startup, held for the life of
//! the process.
//!
//! The coordinator is configured with a list of addresses, not identifiers;
//! identifiers are learned by asking each node who it is. Nodes are never
//! re-discovered afterward, so a Storage Node that restarts mid-run (and
//! mints a new identifier) becomes unreachable under its old one until the
//! coordinator itself restarts.

use dfs_core::DfsError;

#[derive(Debug, Clone)]
pub struct NodeHandle {
    pub node_id: String,
    pub base_url: String,
}

/// Query every configured storage address for its node id, failing startup
/// if any one of them cannot be reached.
pub async fn discover_nodes(client: &reqwest::Client, storage_addrs: &[String]) -> anyhow::Result<Vec<NodeHandle>> {
    let mut handles = Vec::with_capacity(storage_addrs.len());
    for addr in storage_addrs {
        let base_url = format!("http://{addr}");
        let node_id = fetch_node_id(client, &base_url).await?;
        tracing::info!(node_id, addr, "discovered storage node");
        handles.push(NodeHandle { node_id, base_url });
    }
    Ok(handles)
}

async fn fetch_node_id(client: &reqwest::Client, base_url: &str) -> anyhow::Result<String> {
    #[derive(serde::Deserialize)]
    struct NodeIdResponse {
        node_id: String,
    }

    let resp = client
        .get(format!("{base_url}/api/node-id"))
        .send()
        .await?
        .error_for_status()?;
    let body: NodeIdResponse = resp.json().await?;
    Ok(body.node_id)
}

/// Look up a node handle by id among the nodes discovered at startup.
pub fn find_node<'a>(nodes: &'a [NodeHandle], node_id: &str) -> Option<&'a NodeHandle> {
    nodes.iter().find(|n| n.node_id == node_id)
}

pub fn ensure_replication_satisfiable(node_count: usize, replication_factor: usize) -> Result<(), DfsError> {
    if replication_factor > node_count {
        return Err(DfsError::internal(format!(
            "replication factor {replication_factor} exceeds the {node_count} known storage node(s)"
        )));
    }
    Ok(())
}
