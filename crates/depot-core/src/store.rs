//! The storage facade contract
//!
//! This trait is the only surface the gateway (or any other caller)
//! consumes. A second backend (e.g. a document database) would be a
//! second implementation of the same trait behind `open_store`.

use crate::model::{Bucket, Resource};
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Bucket/resource-centric storage operations
///
/// Implementations must make the compound operations (create-if-absent,
/// cascade deletes, attach-with-existence-check) atomic with respect to
/// each other for a given bucket.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a bucket; errors if a bucket with this name exists
    async fn create_bucket(&self, name: &str) -> Result<Bucket>;

    /// Delete a bucket with all its resources, channels, and memberships
    async fn delete_bucket(&self, name: &str) -> Result<()>;

    /// Resolve a bucket by name
    async fn find_bucket(&self, name: &str) -> Result<Bucket>;

    /// Define a channel on a bucket; errors if the name is taken
    async fn create_channel(&self, bucket: &str, channel: &str) -> Result<()>;

    /// Remove a channel and every membership marker under it
    async fn delete_channel(&self, bucket: &str, channel: &str) -> Result<()>;

    /// Store an artifact at `(path, file)`, overwriting any prior content
    /// at that location, and return the resource identifier
    async fn push(&self, bucket: &str, path: &str, file: &str, data: &[u8]) -> Result<String>;

    /// Read back the raw bytes of a resource
    async fn pull(&self, bucket: &str, uuid: &str) -> Result<Bytes>;

    /// Look up a resource descriptor; `Ok(None)` when absent
    async fn find(&self, bucket: &str, uuid: &str) -> Result<Option<Resource>>;

    /// Delete a resource's content and descriptor, detaching it from any
    /// channel that references it
    async fn delete(&self, bucket: &str, uuid: &str) -> Result<()>;

    /// Attach a resource to a channel; the channel and the resource must
    /// both exist, and re-attaching is an error
    async fn attach(&self, bucket: &str, uuid: &str, channel: &str) -> Result<()>;

    /// Detach a resource from a channel; errors if it is not attached
    async fn detach(&self, bucket: &str, uuid: &str, channel: &str) -> Result<()>;

    /// Serialize the resource listing for a bucket, or for one of its
    /// channels when `channel` is non-empty
    async fn manifest(&self, bucket: &str, channel: &str) -> Result<Vec<u8>>;
}
