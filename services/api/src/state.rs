//! Application state shared across handlers

use std::sync::Arc;

use common::config::ServerConfig;

use crate::renderer::Renderer;
use crate::uploader::AssetStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub server_config: ServerConfig,
    pub renderer: Arc<Renderer>,
    /// Present only when storage credentials are configured
    pub asset_store: Option<AssetStore>,
}
