//! [`ObjectStore`] backed by Amazon S3.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, instrument};

use crate::storage::{ObjectStore, StorageError};

/// Whole-object reads and writes against S3.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    max_object_bytes: u64,
}

impl S3ObjectStore {
    /// Wrap `client`, refusing to download objects larger than `max_object_bytes`.
    pub fn new(client: aws_sdk_s3::Client, max_object_bytes: u64) -> Self {
        Self {
            client,
            max_object_bytes,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self))]
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(se) if se.is_no_such_key() => StorageError::NotFound {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                },
                _ => StorageError::Backend(DisplayErrorContext(&e).to_string()),
            })?;

        // Refuse before buffering when S3 reports the size up front.
        if let Some(size) = resp.content_length().and_then(|n| u64::try_from(n).ok()) {
            if size > self.max_object_bytes {
                return Err(StorageError::TooLarge {
                    size,
                    limit: self.max_object_bytes,
                });
            }
        }

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("failed to read {bucket}/{key}: {e}")))?
            .into_bytes();
        debug!(bytes = body.len(), "object fetched");
        Ok(body)
    }

    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
