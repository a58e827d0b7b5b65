use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::renderer::Renderer;
use api::routes;
use api::state::AppState;
use api::uploader::AssetStore;
use common::config::{RenderConfig, ServerConfig, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting render API service");

    let server_config = ServerConfig::from_env();
    let render_config = RenderConfig::from_env();

    // The renders directory must exist before anything is served from it
    tokio::fs::create_dir_all(&render_config.renders_dir).await?;

    // Initialize the object store client, if configured
    let asset_store = match StorageConfig::from_env() {
        Some(storage_config) => {
            info!(bucket = %storage_config.bucket, region = %storage_config.region, "S3 configured");
            Some(AssetStore::new(&storage_config).await)
        }
        None => {
            warn!("S3 not configured; uploads will be rejected");
            None
        }
    };

    let renderer = Renderer::new(render_config, server_config.public_base_url.clone());

    let app_state = AppState {
        server_config: server_config.clone(),
        renderer: Arc::new(renderer),
        asset_store,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    info!("Render API service listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
