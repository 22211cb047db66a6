//! Runs one sealing job end to end.
//!
//! validate → fetch source → seal → store `<object_key><suffix>` → report.
//! Nothing is written unless sealing succeeded; the envelope is written in a
//! single put.

use std::sync::Arc;

use bytes::Bytes;
use common::protocol::{SealRequest, SealResponse};
use common::SealError;
use envelope::{EncryptionPipeline, KeyProvider, KeyReference};
use tracing::{info, instrument};

use crate::config::Config;
use crate::storage::{ObjectStore, StorageError};

/// Executes sealing jobs against an object store and a key provider.
///
/// Cheap to clone; holds only shared collaborators and immutable settings.
#[derive(Clone)]
pub struct JobRunner {
    store: Arc<dyn ObjectStore>,
    pipeline: EncryptionPipeline,
    encrypted_suffix: Arc<str>,
    max_object_bytes: u64,
}

impl JobRunner {
    /// Create a runner from its collaborators and the service configuration.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        key_provider: Arc<dyn KeyProvider>,
        cfg: &Config,
    ) -> Self {
        Self {
            store,
            pipeline: EncryptionPipeline::new(key_provider)
                .with_key_fetch_timeout(cfg.key_fetch_timeout()),
            encrypted_suffix: Arc::from(cfg.encrypted_suffix.as_str()),
            max_object_bytes: cfg.max_object_bytes,
        }
    }

    /// Seal `req.bucket/req.object_key` and store the envelope beside it.
    ///
    /// # Errors
    ///
    /// Returns the [`SealError`] category of the first failing step.
    #[instrument(
        skip_all,
        fields(
            job_id = %uuid::Uuid::new_v4(),
            bucket = %req.bucket,
            object_key = %req.object_key,
            key_name = %req.key_name,
        )
    )]
    pub async fn run(&self, req: &SealRequest) -> Result<SealResponse, SealError> {
        req.validate()?;

        let plaintext = self
            .store
            .get(&req.bucket, &req.object_key)
            .await
            .map_err(source_error)?;
        if plaintext.len() as u64 > self.max_object_bytes {
            return Err(SealError::InputInvalid(format!(
                "source object of {} bytes exceeds the {}-byte limit",
                plaintext.len(),
                self.max_object_bytes
            )));
        }

        let key_ref = KeyReference::new(&req.key_service_url, &req.key_name);
        let envelope = self.pipeline.seal_payload(&plaintext, &key_ref).await?;
        drop(plaintext);

        let destination = format!("{}{}", req.object_key, self.encrypted_suffix);
        let envelope_len = envelope.len();
        self.store
            .put(&req.bucket, &destination, Bytes::from(envelope))
            .await
            .map_err(|e| SealError::DestinationWriteFailure(e.to_string()))?;

        info!(destination = %destination, envelope_len, "envelope stored");
        Ok(SealResponse::stored(destination))
    }
}

fn source_error(err: StorageError) -> SealError {
    match err {
        StorageError::TooLarge { .. } => SealError::InputInvalid(err.to_string()),
        StorageError::NotFound { .. } | StorageError::Backend(_) => {
            SealError::SourceNotFound(err.to_string())
        }
    }
}
