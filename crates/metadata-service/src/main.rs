//! metadata-service — keyed document store mapping `file_id` to its
//! `FileMetadata` record.

mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use dfs_core::config::MetadataServiceConfig;
use dfs_stores::MetadataStore;

use handlers::ServiceState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = MetadataServiceConfig::from_env();

    tracing::info!(
        metadata_dir = %config.metadata_dir.display(),
        port = config.port,
        "metadata-service starting"
    );

    let store = Arc::new(MetadataStore::new(&config.metadata_dir)?);
    let state = ServiceState {
        store,
        started_at: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(handlers::handle_status))
        .route(
            "/metadata",
            axum::routing::post(handlers::handle_save),
        )
        .route(
            "/metadata/{file_id}",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .with_state(state);

    let app = Router::new().nest("/api", api_routes).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "metadata-service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
