//! storage-node — blob store addressable by chunk identifier.
//!
//! Generates a fresh opaque node identifier at process start (no
//! persistence): across restarts, metadata naming the old identifier
//! becomes unreachable. See DESIGN.md.

mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use dfs_core::config::StorageNodeConfig;
use dfs_stores::ChunkStore;

use handlers::NodeState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = StorageNodeConfig::from_env();
    let node_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        node_id,
        storage_dir = %config.storage_dir.display(),
        port = config.port,
        "storage-node starting"
    );

    let store = Arc::new(ChunkStore::new(&config.storage_dir)?);
    let state = NodeState {
        node_id,
        store,
        started_at: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/node-id", get(handlers::handle_node_id))
        .route("/status", get(handlers::handle_status))
        .route(
            "/chunks/{chunk_id}",
            put(handlers::handle_put_chunk)
                .get(handlers::handle_get_chunk)
                .delete(handlers::handle_delete_chunk),
        )
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(DefaultBodyLimit::disable());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "storage-node listening");
    axum::serve(listener, app).await?;
    Ok(())
}
