//! Error types for the depot-core crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Bucket not found
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// Bucket already exists
    #[error("bucket already exists: {0}")]
    BucketAlreadyExists(String),

    /// Channel not found on the bucket
    #[error("channel not found: {bucket}/{channel}")]
    ChannelNotFound { bucket: String, channel: String },

    /// Channel already exists on the bucket
    #[error("channel already exists: {bucket}/{channel}")]
    ChannelAlreadyExists { bucket: String, channel: String },

    /// Resource not found in the bucket
    #[error("resource not found: {bucket}/{uuid}")]
    ResourceNotFound { bucket: String, uuid: String },

    /// Resource is not attached to the channel
    #[error("resource {uuid} not attached to channel {channel}")]
    NotAttached { channel: String, uuid: String },

    /// Resource is already attached to the channel
    #[error("resource {uuid} already attached to channel {channel}")]
    AlreadyAttached { channel: String, uuid: String },

    /// Unsupported backend selector in the configuration
    #[error("unsupported storage backend: {0}")]
    UnsupportedBackend(String),

    /// Underlying filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor encode/decode error
    #[error("serialization error: {0}")]
    Serialization(String),
}
