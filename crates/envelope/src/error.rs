//! Errors produced by the envelope engine.

use common::SealError;
use thiserror::Error;

use crate::keys::KeyProviderError;

/// Errors produced while sealing or opening an envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The entropy source or the cipher backend failed.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),

    /// The public key could not be resolved from the key-management service.
    #[error("key resolution failed: {0}")]
    KeyResolution(String),

    /// Modulus and exponent do not form a usable RSA public key.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The secret does not fit the OAEP-SHA256 capacity of the key.
    #[error("secret of {len} bytes exceeds the {max}-byte OAEP capacity of the key")]
    SecretTooLarge {
        /// Length of the rejected secret.
        len: usize,
        /// Largest secret the key can wrap.
        max: usize,
    },

    /// The envelope bytes violate the binary layout.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}

impl From<KeyProviderError> for EnvelopeError {
    fn from(err: KeyProviderError) -> Self {
        match err {
            KeyProviderError::UnsupportedKey(_) => Self::InvalidKeyMaterial(err.to_string()),
            KeyProviderError::NotFound(_)
            | KeyProviderError::AccessDenied(_)
            | KeyProviderError::Unavailable(_) => Self::KeyResolution(err.to_string()),
        }
    }
}

impl From<EnvelopeError> for SealError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::CryptoFailure(m) => SealError::CryptoFailure(m),
            EnvelopeError::KeyResolution(m) => SealError::KeyResolutionFailure(m),
            EnvelopeError::InvalidKeyMaterial(m) => SealError::InvalidKeyMaterial(m),
            EnvelopeError::SecretTooLarge { .. } => SealError::SecretTooLarge(err.to_string()),
            EnvelopeError::MalformedEnvelope(m) => SealError::MalformedEnvelope(m),
        }
    }
}
