//! Gateway configuration

use depot_core::{Backend, FileConfig, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Bucket whose content tree is served under `/upgrade/`
    pub bucket: String,
    /// Metadata root for the file backend
    pub meta_root: PathBuf,
    /// Content root for the file backend
    pub data_root: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8866,
            bucket: "updater".to_string(),
            meta_root: PathBuf::from("./depot/root"),
            data_root: PathBuf::from("./depot/data"),
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Storage configuration for the file backend
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: Backend::File,
            file: FileConfig {
                meta_root: self.meta_root.clone(),
                data_root: self.data_root.clone(),
            },
        }
    }
}
