//! Store configuration and backend selection

use crate::fs::FileStore;
use crate::store::Storage;
use crate::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Persistence backend selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local-filesystem backend (the only implemented one)
    #[default]
    File,
    /// Reserved for a document-database backend; selecting it is an error
    Mongo,
}

/// Filesystem roots for the file backend
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileConfig {
    /// Root for descriptors and membership markers
    pub meta_root: PathBuf,
    /// Root for raw resource content
    pub data_root: PathBuf,
}

/// Storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Which backend to open
    #[serde(default)]
    pub backend: Backend,
    /// File backend settings
    pub file: FileConfig,
}

/// Open the configured backend and return it as a storage handle.
///
/// The handle is an explicit object to be threaded through callers;
/// there is deliberately no process-wide active store, so tests can spin
/// up independent stores side by side.
pub async fn open_store(config: StoreConfig) -> Result<Arc<dyn Storage>> {
    match config.backend {
        Backend::File => Ok(Arc::new(FileStore::open(config.file).await?)),
        Backend::Mongo => Err(StoreError::UnsupportedBackend("mongo".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_rejects_reserved_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: Backend::Mongo,
            file: FileConfig {
                meta_root: dir.path().join("root"),
                data_root: dir.path().join("data"),
            },
        };
        let result = open_store(config).await;
        assert!(matches!(result, Err(StoreError::UnsupportedBackend(_))));
    }

    #[tokio::test]
    async fn open_creates_missing_roots() {
        let dir = tempfile::tempdir().unwrap();
        let meta_root = dir.path().join("root");
        let data_root = dir.path().join("data");
        let config = StoreConfig {
            backend: Backend::File,
            file: FileConfig {
                meta_root: meta_root.clone(),
                data_root: data_root.clone(),
            },
        };
        open_store(config).await.unwrap();
        assert!(meta_root.is_dir());
        assert!(data_root.is_dir());
    }

    #[test]
    fn backend_selector_parses_lowercase() {
        let backend: Backend = serde_json::from_str("\"file\"").unwrap();
        assert_eq!(backend, Backend::File);
        let backend: Backend = serde_json::from_str("\"mongo\"").unwrap();
        assert_eq!(backend, Backend::Mongo);
    }
}
