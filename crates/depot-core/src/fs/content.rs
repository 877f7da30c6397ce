//! Raw resource bytes under the data root
//!
//! Content lives at `<data>/<bucket-id><path><file>`, with `path`
//! normalized to begin and end with `/`. This addressing is independent
//! of the resource identifier, so the same bytes can be found either by
//! walking the path directly (the gateway's static tree) or by resolving
//! through the descriptor.

use crate::error::Result;
use crate::ident;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// Read/write access to the content tree
#[derive(Clone, Debug)]
pub(crate) struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Per-bucket content namespace
    pub fn bucket_dir(&self, bucket_id: &str) -> PathBuf {
        self.root.join(bucket_id)
    }

    fn blob_path(&self, bucket_id: &str, path: &str, file: &str) -> PathBuf {
        // `path` is normalized; drop the leading separator so the join
        // stays under the bucket directory.
        self.bucket_dir(bucket_id)
            .join(path.trim_start_matches('/'))
            .join(file)
    }

    /// Create the bucket's content namespace if needed
    pub async fn ensure_bucket(&self, bucket_id: &str) -> Result<()> {
        fs::create_dir_all(self.bucket_dir(bucket_id)).await?;
        Ok(())
    }

    /// Write bytes, creating intermediate directories, and return the
    /// `(md5, size)` digest for the resource descriptor
    pub async fn write(
        &self,
        bucket_id: &str,
        path: &str,
        file: &str,
        data: &[u8],
    ) -> Result<(String, u64)> {
        let blob = self.blob_path(bucket_id, path, file);
        if let Some(dir) = blob.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&blob, data).await?;
        Ok(ident::content_digest(data))
    }

    /// Read bytes back; `Ok(None)` when nothing is stored at the location
    pub async fn read(
        &self,
        bucket_id: &str,
        path: &str,
        file: &str,
    ) -> Result<Option<Vec<u8>>> {
        match fs::read(self.blob_path(bucket_id, path, file)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the bytes at a location; `false` when already absent
    pub async fn remove(&self, bucket_id: &str, path: &str, file: &str) -> Result<bool> {
        match fs::remove_file(self.blob_path(bucket_id, path, file)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the bucket's whole content namespace
    pub async fn remove_bucket(&self, bucket_id: &str) -> Result<()> {
        super::meta::remove_tree(&self.bucket_dir(bucket_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> ContentStore {
        ContentStore::new(dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn write_read_roundtrip_with_digest() {
        let dir = tempfile::tempdir().unwrap();
        let content = store(&dir);

        let (md5, size) = content
            .write("bid", "/1/2/", "res.txt", b"0123456789")
            .await
            .unwrap();
        assert_eq!(size, 10);
        assert_eq!(md5, ident::derive_id(b"0123456789"));

        let data = content.read("bid", "/1/2/", "res.txt").await.unwrap();
        assert_eq!(data.unwrap(), b"0123456789");

        // Bit-exact layout: <data>/<bucket-id><path><file>
        assert!(dir.path().join("bid/1/2/res.txt").is_file());
    }

    #[tokio::test]
    async fn read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let content = store(&dir);
        assert!(content.read("bid", "/a/", "f").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_replaces_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let content = store(&dir);

        content.write("bid", "/a/", "f", b"one").await.unwrap();
        content.write("bid", "/a/", "f", b"two").await.unwrap();

        let data = content.read("bid", "/a/", "f").await.unwrap().unwrap();
        assert_eq!(data, b"two");
    }

    #[tokio::test]
    async fn remove_reports_absence() {
        let dir = tempfile::tempdir().unwrap();
        let content = store(&dir);

        content.write("bid", "/a/", "f", b"bytes").await.unwrap();
        assert!(content.remove("bid", "/a/", "f").await.unwrap());
        assert!(!content.remove("bid", "/a/", "f").await.unwrap());
    }
}
