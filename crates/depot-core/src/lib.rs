//! # Depot Core
//!
//! Storage layer for the Depot release-artifact store.
//!
//! This crate provides:
//! - **Buckets**: named collections of stored resources
//! - **Channels**: named release tracks grouping a subset of a bucket
//! - **Resources**: binary artifacts addressed by logical path + filename
//! - **Manifests**: serialized listings a client uses to drive downloads
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            HTTP Gateway                 │
//! ├─────────────────────────────────────────┤
//! │          Storage (facade trait)         │
//! ├─────────────────────────────────────────┤
//! │  Metadata  │  Content  │  Membership    │
//! │   store    │   store   │    index       │
//! ├─────────────────────────────────────────┤
//! │           Local filesystem              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Everything is addressed by derived identifiers: the id of a bucket or
//! channel is a hash of its name, the id of a resource is a hash of its
//! normalized path + filename. The persisted tree is the single source of
//! truth; no identifier table is kept in memory.

pub mod config;
pub mod error;
pub mod fs;
pub mod ident;
pub mod model;
pub mod store;

pub use config::{open_store, Backend, FileConfig, StoreConfig};
pub use error::{Result, StoreError};
pub use fs::FileStore;
pub use model::{Bucket, Channel, Resource};
pub use store::Storage;
