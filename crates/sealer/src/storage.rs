//! Object-storage boundary: whole-object get and put.
//!
//! No retries and no partial-object semantics; a call either returns or
//! stores the complete byte sequence, or fails.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors from an [`ObjectStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object does not exist.
    #[error("object {bucket}/{key} not found")]
    NotFound {
        /// Bucket that was searched.
        bucket: String,
        /// Key that was requested.
        key: String,
    },

    /// The object exceeds the size the service is willing to buffer.
    #[error("object of {size} bytes exceeds the {limit}-byte limit")]
    TooLarge {
        /// Reported object size.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// The storage backend failed the request.
    #[error("storage request failed: {0}")]
    Backend(String),
}

/// Named byte-sequence storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of `bucket/key`.
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError>;

    /// Store `body` as `bucket/key`, replacing any existing object.
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), StorageError>;
}
