//! Bucket, channel, and resource descriptors

use crate::ident;
use serde::{Deserialize, Serialize};

/// A named release track scoped to one bucket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name, unique within its bucket
    pub name: String,
}

impl Channel {
    /// Create a channel descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Derived identifier of this channel
    pub fn uuid(&self) -> String {
        ident::derive_id(self.name.as_bytes())
    }
}

/// A named collection of resources and channels
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket name, unique within the store
    pub name: String,

    /// Derived identifier; a pure function of `name`
    #[serde(default)]
    pub uuid: String,

    /// Channels currently defined on this bucket
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Bucket {
    /// Create a bucket descriptor with its derived identifier
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let uuid = ident::derive_id(name.as_bytes());
        Self {
            name,
            uuid,
            channels: Vec::new(),
        }
    }

    /// Whether a channel with this name is defined on the bucket
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }
}

/// One stored artifact
///
/// The identifier is a pure function of `(path, file)`, not of the
/// content: pushing different bytes to the same location overwrites the
/// prior resource under the same uuid. `md5` and `size` are integrity
/// and reporting fields only.
///
/// Field order is the manifest record order and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Derived identifier of `(path, file)`
    pub uuid: String,
    /// Logical filename
    pub file: String,
    /// Logical directory, normalized to begin and end with `/`
    pub path: String,
    /// Content checksum computed at write time
    pub md5: String,
    /// Byte length at write time
    pub size: u64,
}

impl Resource {
    /// Build a resource descriptor for a location, before content digest.
    ///
    /// Normalizes the path and derives the identifier; `md5` and `size`
    /// are filled in by the content store at write time.
    pub fn at(path: &str, file: impl Into<String>) -> Self {
        let path = normalize_path(path);
        let file = file.into();
        let uuid = ident::derive_id(format!("{path}{file}").as_bytes());
        Self {
            uuid,
            file,
            path,
            md5: String::new(),
            size: 0,
        }
    }
}

/// Normalize a logical path to start and end with `/`
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_both_separators() {
        assert_eq!(normalize_path("1/2/"), "/1/2/");
        assert_eq!(normalize_path("/a/"), "/a/");
        assert_eq!(normalize_path("a"), "/a/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn resource_id_depends_on_location_only() {
        let a = Resource::at("1/2/", "res.txt");
        let b = Resource::at("/1/2/", "res.txt");
        assert_eq!(a.uuid, b.uuid);

        let c = Resource::at("1/", "res.txt");
        assert_ne!(a.uuid, c.uuid);
    }

    #[test]
    fn resource_serializes_in_manifest_order() {
        let mut res = Resource::at("/a/", "f.txt");
        res.md5 = "00".into();
        res.size = 2;
        let json = serde_json::to_string(&res).unwrap();
        let uuid = res.uuid;
        assert_eq!(
            json,
            format!(r#"{{"uuid":"{uuid}","file":"f.txt","path":"/a/","md5":"00","size":2}}"#)
        );
    }

    #[test]
    fn bucket_channel_lookup() {
        let mut bucket = Bucket::new("updater");
        assert!(!bucket.has_channel("stable"));
        bucket.channels.push(Channel::new("stable"));
        assert!(bucket.has_channel("stable"));
    }
}
