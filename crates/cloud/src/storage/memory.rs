//! In-memory object storage for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{join_url, validate_object_path, ObjectStorage};
use crate::error::CloudError;

/// A stored object and its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug)]
pub struct MemoryObjectStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
    public_base_url: String,
}

impl MemoryObjectStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.objects.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl Default for MemoryObjectStorage {
    fn default() -> Self {
        Self::new("memory://deepfake-videos")
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), CloudError> {
        validate_object_path(path)?;
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}
