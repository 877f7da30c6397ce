//! Deterministic identifier derivation
//!
//! Every entity in the store is keyed by a hash of its name (buckets,
//! channels) or of its normalized path + filename (resources). The same
//! input must map to the same identifier across runs and processes; the
//! whole addressing scheme rests on that, so there is no persisted
//! name-to-id table anywhere.

use md5::{Digest, Md5};

/// Derive the stable identifier for a name or path key.
///
/// 128-bit MD5, lowercase hex: 32 characters, safe as a path segment.
/// Collision resistance at this size is plenty for distinct names;
/// cryptographic strength is not a requirement here.
pub fn derive_id(input: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Digest content bytes at write time.
///
/// Returns `(md5, size)` for the caller to fold into the resource
/// descriptor. Integrity metadata is derived once, here, and never
/// re-validated on read.
pub fn content_digest(data: &[u8]) -> (String, u64) {
    (derive_id(data), data.len() as u64)
}
