//! Replica placement — which Storage Nodes hold which chunk.
//!
//! Deterministic round robin: chunk `k`'s replica `j` lands on
//! `nodes[(k + j) mod N]`. Re-derivable from `(file_id, chunk_index)` alone,
//! so placement never needs to be looked up anywhere but the metadata record
//! itself.

use dfs_core::DfsError;

use crate::clients::NodeHandle;

/// Select the `r` nodes that should hold replicas of chunk `k`, in the order
/// they should be written (and, on read, tried).
///
/// Fails if `r` exceeds the number of known nodes — a replication factor
/// the deployment cannot satisfy.
pub fn select_replicas(nodes: &[NodeHandle], k: usize, r: usize) -> Result<Vec<NodeHandle>, DfsError> {
    let n = nodes.len();
    if r > n {
        return Err(DfsError::internal(format!(
            "replication factor {r} exceeds the {n} known storage node(s)"
        )));
    }
    Ok((0..r).map(|j| nodes[(k + j) % n].clone()).collect())
}
