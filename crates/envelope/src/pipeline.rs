//! Sealing (and opening) of whole payloads.
//!
//! # Sealing steps
//!
//! Strictly sequential; each step consumes the previous step's output and any
//! failure aborts the whole operation with no partial envelope:
//!
//! 1. generate a one-time key and IV,
//! 2. encrypt the payload,
//! 3. resolve the public key through the [`KeyProvider`] (timeout-bounded, no retry),
//! 4. wrap the key,
//! 5. wrap the IV,
//! 6. encode the envelope.

use std::sync::Arc;
use std::time::Duration;

use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, instrument};

use crate::cipher::{self, SymmetricKeyMaterial};
use crate::codec;
use crate::error::EnvelopeError;
use crate::keys::{KeyProvider, KeyReference};
use crate::wrap;

/// Default bound on a single key-management call.
pub const DEFAULT_KEY_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Seals payloads into envelopes using keys resolved through a [`KeyProvider`].
///
/// Holds no per-operation state; one instance may seal any number of payloads
/// concurrently.
#[derive(Clone)]
pub struct EncryptionPipeline {
    key_provider: Arc<dyn KeyProvider>,
    key_fetch_timeout: Duration,
}

impl EncryptionPipeline {
    /// Create a pipeline resolving keys through `key_provider`.
    pub fn new(key_provider: Arc<dyn KeyProvider>) -> Self {
        Self {
            key_provider,
            key_fetch_timeout: DEFAULT_KEY_FETCH_TIMEOUT,
        }
    }

    /// Override the key-management call timeout.
    pub fn with_key_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.key_fetch_timeout = timeout;
        self
    }

    /// Seal `plaintext` under the public key named by `key_ref`.
    ///
    /// Returns the envelope bytes. The symmetric key never leaves this call.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::CryptoFailure`] on entropy or cipher failure.
    /// - [`EnvelopeError::KeyResolution`] if the key lookup fails or times out.
    /// - [`EnvelopeError::InvalidKeyMaterial`] if the returned key is unusable.
    /// - [`EnvelopeError::SecretTooLarge`] if the key is too small to wrap the material.
    #[instrument(
        skip_all,
        fields(key_name = %key_ref.key_name, plaintext_len = plaintext.len())
    )]
    pub async fn seal_payload(
        &self,
        plaintext: &[u8],
        key_ref: &KeyReference,
    ) -> Result<Vec<u8>, EnvelopeError> {
        let material = cipher::generate_key()?;
        let ciphertext = cipher::encrypt(plaintext, &material)?;

        let public_key = self.resolve_public_key(key_ref).await?;

        let wrapped_key = wrap::wrap(material.key(), &public_key)?;
        let wrapped_iv = wrap::wrap(material.iv(), &public_key)?;
        drop(material);

        let envelope = codec::encode(&wrapped_key, &wrapped_iv, &ciphertext)?;
        debug!(
            wrapped_key_len = wrapped_key.len(),
            wrapped_iv_len = wrapped_iv.len(),
            ciphertext_len = ciphertext.len(),
            envelope_len = envelope.len(),
            "payload sealed"
        );
        Ok(envelope)
    }

    async fn resolve_public_key(&self, key_ref: &KeyReference) -> Result<RsaPublicKey, EnvelopeError> {
        let material = tokio::time::timeout(
            self.key_fetch_timeout,
            self.key_provider.fetch_public_key(key_ref),
        )
        .await
        .map_err(|_| {
            EnvelopeError::KeyResolution(format!(
                "key service did not answer within {}ms",
                self.key_fetch_timeout.as_millis()
            ))
        })??;
        wrap::public_key_from_material(&material)
    }
}

/// Open an envelope produced by [`EncryptionPipeline::seal_payload`].
///
/// # Errors
///
/// - [`EnvelopeError::MalformedEnvelope`] if the layout is violated.
/// - [`EnvelopeError::CryptoFailure`] if unwrapping fails, the unwrapped
///   material has the wrong length, or the ciphertext padding is invalid.
pub fn open_envelope(envelope: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>, EnvelopeError> {
    let parts = codec::decode(envelope)?;
    let key = wrap::unwrap(parts.wrapped_key, private_key)?;
    let iv = wrap::unwrap(parts.wrapped_iv, private_key)?;
    let material = SymmetricKeyMaterial::from_parts(&key, &iv)?;
    cipher::decrypt(parts.ciphertext, &material)
}
