//! Object storage for uploaded videos.
//!
//! Mirrors the two calls the upload workflow needs from a hosted bucket:
//! upload-by-path and public-URL-by-path.

use async_trait::async_trait;

use crate::error::CloudError;

pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalObjectStorage;
pub use memory::MemoryObjectStorage;
pub use s3::S3ObjectStorage;

/// A bucket of objects addressed by relative path.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `path`, overwriting any existing object.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), CloudError>;

    /// Publicly retrievable URL for `path`. Does not check existence.
    fn public_url(&self, path: &str) -> String;
}

/// Reject paths that are empty, absolute, or contain `..` / backslashes.
pub fn validate_object_path(path: &str) -> Result<(), CloudError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|segment| segment.is_empty() || segment == "..");
    if invalid {
        return Err(CloudError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Join a base URL and an object path with exactly one `/`.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}
