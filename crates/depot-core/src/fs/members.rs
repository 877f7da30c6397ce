//! Channel membership markers
//!
//! "Resource R is attached to channel C" is a zero-length file at
//! `<root>/<bucket-id>/<channel-id>/<resource-id>`. The filesystem is
//! the index: membership survives restarts, listing is directory
//! enumeration, and deleting a channel drops the whole namespace in one
//! call. Listing cost is O(n), which is the accepted tradeoff.

use crate::error::Result;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// Marker files under the metadata root
#[derive(Clone, Debug)]
pub(crate) struct MemberIndex {
    root: PathBuf,
}

impl MemberIndex {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn channel_dir(&self, bucket_id: &str, channel_id: &str) -> PathBuf {
        self.root.join(bucket_id).join(channel_id)
    }

    fn marker(&self, bucket_id: &str, channel_id: &str, resource_id: &str) -> PathBuf {
        self.channel_dir(bucket_id, channel_id).join(resource_id)
    }

    /// Create the channel's membership namespace
    pub async fn ensure_channel(&self, bucket_id: &str, channel_id: &str) -> Result<()> {
        fs::create_dir_all(self.channel_dir(bucket_id, channel_id)).await?;
        Ok(())
    }

    /// Drop the channel's membership namespace wholesale
    pub async fn remove_channel(&self, bucket_id: &str, channel_id: &str) -> Result<()> {
        super::meta::remove_tree(&self.channel_dir(bucket_id, channel_id)).await
    }

    /// Create a marker; `false` when the resource was already attached
    pub async fn attach(
        &self,
        bucket_id: &str,
        channel_id: &str,
        resource_id: &str,
    ) -> Result<bool> {
        let marker = self.marker(bucket_id, channel_id, resource_id);
        if fs::try_exists(&marker).await? {
            return Ok(false);
        }
        if let Some(dir) = marker.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&marker, b"").await?;
        Ok(true)
    }

    /// Remove a marker; `false` when no marker existed
    pub async fn detach(
        &self,
        bucket_id: &str,
        channel_id: &str,
        resource_id: &str,
    ) -> Result<bool> {
        match fs::remove_file(self.marker(bucket_id, channel_id, resource_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Enumerate the resource identifiers attached to a channel
    pub async fn list_attached(
        &self,
        bucket_id: &str,
        channel_id: &str,
    ) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(self.channel_dir(bucket_id, channel_id)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }
        Ok(ids)
    }
}
