//! File-backed storage
//!
//! Composes the three on-disk stores (descriptors, content, membership
//! markers) behind the [`Storage`] facade and enforces the cross-entity
//! invariants none of them can see alone: existence checks before
//! create/delete, cascades, and channel gating on attach.
//!
//! Compound operations are check-then-write sequences over independent
//! filesystem calls, so each one runs under a per-bucket async mutex;
//! operations on different buckets proceed in parallel.

mod content;
mod members;
mod meta;

use crate::config::FileConfig;
use crate::error::{Result, StoreError};
use crate::ident;
use crate::model::{Bucket, Channel, Resource};
use crate::store::Storage;
use async_trait::async_trait;
use bytes::Bytes;
use content::ContentStore;
use dashmap::DashMap;
use members::MemberIndex;
use meta::MetaStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// The file backend
pub struct FileStore {
    meta: MetaStore,
    content: ContentStore,
    members: MemberIndex,
    /// Per-bucket serialization point for compound operations
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl FileStore {
    /// Open a file store over the two roots, creating them if absent
    pub async fn open(config: FileConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.meta_root).await?;
        tokio::fs::create_dir_all(&config.data_root).await?;
        Ok(Self {
            meta: MetaStore::new(config.meta_root.clone()),
            content: ContentStore::new(config.data_root),
            members: MemberIndex::new(config.meta_root),
            locks: DashMap::new(),
        })
    }

    // Entries are retained for the store's lifetime: pruning on bucket
    // delete could hand a waiter the old mutex while a re-create gets a
    // fresh one, breaking the one-mutex-per-bucket invariant.
    fn bucket_lock(&self, bucket_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(bucket_id.to_string())
            .or_default()
            .clone()
    }

    /// Re-derive the id and load the descriptor; the persisted store is
    /// the single source of truth, nothing is cached across calls.
    async fn load_bucket(&self, name: &str) -> Result<Bucket> {
        let bucket_id = ident::derive_id(name.as_bytes());
        self.meta
            .read_bucket(&bucket_id)
            .await?
            .ok_or_else(|| StoreError::BucketNotFound(name.to_string()))
    }

    async fn load_resource(&self, bucket: &Bucket, uuid: &str) -> Result<Resource> {
        self.meta
            .read_resource(&bucket.uuid, uuid)
            .await?
            .ok_or_else(|| StoreError::ResourceNotFound {
                bucket: bucket.name.clone(),
                uuid: uuid.to_string(),
            })
    }

    fn channel_not_found(bucket: &Bucket, channel: &str) -> StoreError {
        StoreError::ChannelNotFound {
            bucket: bucket.name.clone(),
            channel: channel.to_string(),
        }
    }

    async fn list_all(&self, bucket: &Bucket) -> Result<Vec<Resource>> {
        self.meta.list_resources(&bucket.uuid).await
    }

    async fn list_by_channel(&self, bucket: &Bucket, channel: &str) -> Result<Vec<Resource>> {
        // the .cnl descriptor is the authoritative channel record; a
        // cascade delete removes it together with the membership dir
        let channel_id = ident::derive_id(channel.as_bytes());
        if self
            .meta
            .read_channel(&bucket.uuid, &channel_id)
            .await?
            .is_none()
        {
            return Err(Self::channel_not_found(bucket, channel));
        }
        let attached = self.members.list_attached(&bucket.uuid, &channel_id).await?;

        let mut resources = Vec::with_capacity(attached.len());
        for uuid in attached {
            // A marker whose descriptor cannot be read is stale (e.g. an
            // interrupted delete) and is skipped rather than failing the
            // whole listing.
            match self.meta.read_resource(&bucket.uuid, &uuid).await {
                Ok(Some(resource)) => resources.push(resource),
                Ok(None) => debug!(%uuid, channel, "skipping stale membership marker"),
                Err(err) => debug!(%uuid, channel, %err, "skipping unreadable descriptor"),
            }
        }
        Ok(resources)
    }
}

#[async_trait]
impl Storage for FileStore {
    #[instrument(skip(self))]
    async fn create_bucket(&self, name: &str) -> Result<Bucket> {
        let bucket_id = ident::derive_id(name.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        if self.meta.read_bucket(&bucket_id).await?.is_some() {
            return Err(StoreError::BucketAlreadyExists(name.to_string()));
        }

        let bucket = Bucket::new(name);
        self.meta.write_bucket(&bucket).await?;
        self.content.ensure_bucket(&bucket.uuid).await?;
        debug!(bucket = name, uuid = %bucket.uuid, "bucket created");
        Ok(bucket)
    }

    #[instrument(skip(self))]
    async fn delete_bucket(&self, name: &str) -> Result<()> {
        let bucket_id = ident::derive_id(name.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let bucket = self.load_bucket(name).await?;
        self.content.remove_bucket(&bucket.uuid).await?;
        self.meta.remove_bucket(&bucket.uuid).await?;
        debug!(bucket = name, "bucket deleted");
        Ok(())
    }

    async fn find_bucket(&self, name: &str) -> Result<Bucket> {
        self.load_bucket(name).await
    }

    #[instrument(skip(self))]
    async fn create_channel(&self, bucket: &str, channel: &str) -> Result<()> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let mut descriptor = self.load_bucket(bucket).await?;
        if descriptor.has_channel(channel) {
            return Err(StoreError::ChannelAlreadyExists {
                bucket: bucket.to_string(),
                channel: channel.to_string(),
            });
        }

        let entry = Channel::new(channel);
        self.meta.write_channel(&descriptor.uuid, &entry).await?;
        self.members
            .ensure_channel(&descriptor.uuid, &entry.uuid())
            .await?;
        descriptor.channels.push(entry);
        self.meta.write_bucket(&descriptor).await
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, bucket: &str, channel: &str) -> Result<()> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let mut descriptor = self.load_bucket(bucket).await?;
        if !descriptor.has_channel(channel) {
            return Err(Self::channel_not_found(&descriptor, channel));
        }

        let channel_id = ident::derive_id(channel.as_bytes());
        self.members
            .remove_channel(&descriptor.uuid, &channel_id)
            .await?;
        self.meta
            .remove_channel(&descriptor.uuid, &channel_id)
            .await?;
        descriptor.channels.retain(|c| c.name != channel);
        self.meta.write_bucket(&descriptor).await
    }

    #[instrument(skip(self, data))]
    async fn push(&self, bucket: &str, path: &str, file: &str, data: &[u8]) -> Result<String> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let descriptor = self.load_bucket(bucket).await?;
        let mut resource = Resource::at(path, file);
        let (md5, size) = self
            .content
            .write(&descriptor.uuid, &resource.path, &resource.file, data)
            .await?;
        resource.md5 = md5;
        resource.size = size;
        self.meta.write_resource(&descriptor.uuid, &resource).await?;
        debug!(bucket, uuid = %resource.uuid, size, "resource pushed");
        Ok(resource.uuid)
    }

    #[instrument(skip(self))]
    async fn pull(&self, bucket: &str, uuid: &str) -> Result<Bytes> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let descriptor = self.load_bucket(bucket).await?;
        let resource = self.load_resource(&descriptor, uuid).await?;
        let data = self
            .content
            .read(&descriptor.uuid, &resource.path, &resource.file)
            .await?
            .ok_or_else(|| StoreError::ResourceNotFound {
                bucket: bucket.to_string(),
                uuid: uuid.to_string(),
            })?;
        Ok(Bytes::from(data))
    }

    async fn find(&self, bucket: &str, uuid: &str) -> Result<Option<Resource>> {
        let descriptor = self.load_bucket(bucket).await?;
        self.meta.read_resource(&descriptor.uuid, uuid).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, bucket: &str, uuid: &str) -> Result<()> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let descriptor = self.load_bucket(bucket).await?;
        let resource = self.load_resource(&descriptor, uuid).await?;

        self.content
            .remove(&descriptor.uuid, &resource.path, &resource.file)
            .await?;
        self.meta.remove_resource(&descriptor.uuid, uuid).await?;

        // No dangling attachments: sweep the marker out of every channel
        // that still references the resource.
        for channel in &descriptor.channels {
            self.members
                .detach(&descriptor.uuid, &channel.uuid(), uuid)
                .await?;
        }
        debug!(bucket, uuid, "resource deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn attach(&self, bucket: &str, uuid: &str, channel: &str) -> Result<()> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let descriptor = self.load_bucket(bucket).await?;
        if !descriptor.has_channel(channel) {
            return Err(Self::channel_not_found(&descriptor, channel));
        }
        // a marker must never point at a resource that was never pushed
        self.load_resource(&descriptor, uuid).await?;

        let channel_id = ident::derive_id(channel.as_bytes());
        let created = self
            .members
            .attach(&descriptor.uuid, &channel_id, uuid)
            .await?;
        if !created {
            return Err(StoreError::AlreadyAttached {
                channel: channel.to_string(),
                uuid: uuid.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn detach(&self, bucket: &str, uuid: &str, channel: &str) -> Result<()> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let descriptor = self.load_bucket(bucket).await?;
        if !descriptor.has_channel(channel) {
            return Err(Self::channel_not_found(&descriptor, channel));
        }

        let channel_id = ident::derive_id(channel.as_bytes());
        let removed = self
            .members
            .detach(&descriptor.uuid, &channel_id, uuid)
            .await?;
        if !removed {
            return Err(StoreError::NotAttached {
                channel: channel.to_string(),
                uuid: uuid.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn manifest(&self, bucket: &str, channel: &str) -> Result<Vec<u8>> {
        let bucket_id = ident::derive_id(bucket.as_bytes());
        let lock = self.bucket_lock(&bucket_id);
        let _guard = lock.lock().await;

        let descriptor = self.load_bucket(bucket).await?;
        let resources = if channel.is_empty() {
            self.list_all(&descriptor).await?
        } else {
            self.list_by_channel(&descriptor, channel).await?
        };
        serde_json::to_vec(&resources).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
