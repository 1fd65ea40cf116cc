use std::sync::Arc;
use std::time::Instant;

use crate::clients::NodeHandle;

#[derive(Clone)]
pub struct CoordinatorState {
    pub http: reqwest::Client,
    pub nodes: Arc<Vec<NodeHandle>>,
    pub metadata_base_url: String,
    pub replication_factor: usize,
    pub started_at: Instant,
}
