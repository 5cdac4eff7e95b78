//! Filesystem-backed object storage.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{join_url, validate_object_path, ObjectStorage};
use crate::error::CloudError;

/// Stores objects under a root directory and serves them from
/// `public_base_url` (the API mounts the root read-only).
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), CloudError> {
        validate_object_path(path)?;
        let dest = self.root.join(path);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = bytes.len();
        tokio::fs::write(&dest, bytes).await?;
        tracing::debug!(path, size, content_type, "Stored object on local disk");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}
