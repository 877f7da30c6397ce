//! Descriptor persistence under the metadata root
//!
//! Layout:
//! - `<root>/<bucket-id>.bkt`: bucket descriptor
//! - `<root>/<bucket-id>/<channel-id>.cnl`: channel descriptor
//! - `<root>/<bucket-id>/<resource-id>.meta`: resource descriptor
//!
//! Bodies are JSON. Reads distinguish "absent" (`Ok(None)`) from real
//! I/O trouble; the facade turns absence into domain-level answers.

use crate::error::{Result, StoreError};
use crate::model::{Bucket, Channel, Resource};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const BUCKET_EXT: &str = "bkt";
const CHANNEL_EXT: &str = "cnl";
const RESOURCE_EXT: &str = "meta";

/// CRUD over the descriptor files
#[derive(Clone, Debug)]
pub(crate) struct MetaStore {
    root: PathBuf,
}

impl MetaStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Per-bucket metadata namespace
    pub fn bucket_dir(&self, bucket_id: &str) -> PathBuf {
        self.root.join(bucket_id)
    }

    fn bucket_file(&self, bucket_id: &str) -> PathBuf {
        self.root.join(format!("{bucket_id}.{BUCKET_EXT}"))
    }

    fn channel_file(&self, bucket_id: &str, channel_id: &str) -> PathBuf {
        self.bucket_dir(bucket_id)
            .join(format!("{channel_id}.{CHANNEL_EXT}"))
    }

    fn resource_file(&self, bucket_id: &str, resource_id: &str) -> PathBuf {
        self.bucket_dir(bucket_id)
            .join(format!("{resource_id}.{RESOURCE_EXT}"))
    }

    /// Write a bucket descriptor, creating the bucket's metadata
    /// namespace if needed
    pub async fn write_bucket(&self, bucket: &Bucket) -> Result<()> {
        fs::create_dir_all(self.bucket_dir(&bucket.uuid)).await?;
        write_json(&self.bucket_file(&bucket.uuid), bucket).await
    }

    pub async fn read_bucket(&self, bucket_id: &str) -> Result<Option<Bucket>> {
        read_json(&self.bucket_file(bucket_id)).await
    }

    /// Remove the bucket descriptor and the whole metadata namespace.
    ///
    /// The namespace removal tolerates a partially deleted tree; a
    /// missing descriptor file still surfaces as an error.
    pub async fn remove_bucket(&self, bucket_id: &str) -> Result<()> {
        remove_tree(&self.bucket_dir(bucket_id)).await?;
        fs::remove_file(self.bucket_file(bucket_id)).await?;
        Ok(())
    }

    pub async fn write_channel(&self, bucket_id: &str, channel: &Channel) -> Result<()> {
        write_json(&self.channel_file(bucket_id, &channel.uuid()), channel).await
    }

    pub async fn read_channel(
        &self,
        bucket_id: &str,
        channel_id: &str,
    ) -> Result<Option<Channel>> {
        read_json(&self.channel_file(bucket_id, channel_id)).await
    }

    pub async fn remove_channel(&self, bucket_id: &str, channel_id: &str) -> Result<()> {
        fs::remove_file(self.channel_file(bucket_id, channel_id)).await?;
        Ok(())
    }

    pub async fn write_resource(&self, bucket_id: &str, resource: &Resource) -> Result<()> {
        write_json(&self.resource_file(bucket_id, &resource.uuid), resource).await
    }

    pub async fn read_resource(
        &self,
        bucket_id: &str,
        resource_id: &str,
    ) -> Result<Option<Resource>> {
        read_json(&self.resource_file(bucket_id, resource_id)).await
    }

    pub async fn remove_resource(&self, bucket_id: &str, resource_id: &str) -> Result<()> {
        fs::remove_file(self.resource_file(bucket_id, resource_id)).await?;
        Ok(())
    }

    /// Enumerate every resource descriptor in the bucket's namespace.
    ///
    /// Ordering follows directory enumeration and is unspecified.
    pub async fn list_resources(&self, bucket_id: &str) -> Result<Vec<Resource>> {
        let dir = self.bucket_dir(bucket_id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let suffix = format!(".{RESOURCE_EXT}");
        let mut resources = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.ends_with(&suffix) {
                continue;
            }
            if let Some(resource) = read_json::<Resource>(&entry.path()).await? {
                resources.push(resource);
            }
        }
        Ok(resources)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body =
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    fs::write(path, body).await?;
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read(path).await {
        Ok(body) => {
            let value = serde_json::from_slice(&body)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a directory tree, tolerating it being already absent
pub(crate) async fn remove_tree(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
