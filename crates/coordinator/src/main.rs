//! coordinator — the system's single entry point for clients: fans `Upload`,
//! `Download`, and `Delete` out to the Storage Nodes and Metadata Service it
//! was configured with at startup.

mod clients;
mod handlers;
mod placement;
mod state;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use dfs_core::config::CoordinatorConfig;

use state::CoordinatorState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = CoordinatorConfig::from_env();

    tracing::info!(
        storage_addrs = ?config.storage_addrs,
        metadata_addr = config.metadata_addr,
        replication_factor = config.replication_factor,
        port = config.port,
        "coordinator starting"
    );

    let http = reqwest::Client::new();
    let nodes = clients::discover_nodes(&http, &config.storage_addrs).await?;
    if nodes.is_empty() {
        anyhow::bail!("coordinator requires at least one reachable storage node");
    }

    let state = CoordinatorState {
        http,
        nodes: Arc::new(nodes),
        metadata_base_url: format!("http://{}", config.metadata_addr),
        replication_factor: config.replication_factor,
        started_at: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(handlers::handle_status))
        .route("/upload", axum::routing::post(handlers::handle_upload))
        .route("/download/{file_id}", get(handlers::handle_download))
        .route("/files/{file_id}", axum::routing::delete(handlers::handle_delete))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(DefaultBodyLimit::disable());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "coordinator listening");
    axum::serve(listener, app).await?;
    Ok(())
}
