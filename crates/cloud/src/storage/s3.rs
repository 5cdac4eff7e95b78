//! Amazon S3 (or S3-compatible) object storage.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{join_url, validate_object_path, ObjectStorage};
use crate::error::CloudError;

/// Writes objects with `PutObject` into a single bucket.
///
/// Public URLs are built from `public_base_url` (a CDN or the bucket's
/// website endpoint) rather than presigned, matching a public bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStorage {
    pub fn new(client: Client, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Build a client from the standard AWS environment (credentials chain,
    /// `AWS_REGION`, optional `AWS_ENDPOINT_URL`).
    pub async fn from_env(
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, CloudError> {
        let bucket = bucket.into();
        if bucket.trim().is_empty() {
            return Err(CloudError::Configuration("S3 bucket name is empty".into()));
        }
        let config = aws_config::load_from_env().await;
        Ok(Self::new(Client::new(&config), bucket, public_base_url))
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), CloudError> {
        validate_object_path(path)?;
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| CloudError::Storage(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket = %self.bucket, path, size, "Stored object in S3");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}
