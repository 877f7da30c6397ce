//! Application state

use crate::config::GatewayConfig;
use depot_core::{open_store, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Storage handle
    pub store: Arc<dyn Storage>,
    /// Content directory of the bucket fixed at startup
    pub serve_root: PathBuf,
}

impl AppState {
    /// Open the store and resolve the served bucket.
    ///
    /// Startup fails if the configured bucket does not exist; the
    /// `/upgrade/` tree has nothing to serve without it.
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let store = open_store(config.store_config()).await?;
        let bucket = store.find_bucket(&config.bucket).await?;
        let serve_root = config.data_root.join(&bucket.uuid);

        info!(bucket = %bucket.name, uuid = %bucket.uuid, "serving bucket");

        Ok(Self {
            config,
            store,
            serve_root,
        })
    }
}
