//! Key-management boundary: where the wrapping public key comes from.
//!
//! The engine never talks to a key-management service directly. Callers pass
//! a [`KeyProvider`] implementation; the service binary supplies one backed by
//! AWS KMS and tests supply `MockKeyProvider`.

use async_trait::async_trait;
use rsa::{traits::PublicKeyParts, RsaPublicKey};
use thiserror::Error;

/// Identifies an asymmetric key held by a key-management service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReference {
    /// Base URL of the key-management service.
    pub service_url: String,
    /// Name or id of the key within that service.
    pub key_name: String,
}

impl KeyReference {
    /// Construct a [`KeyReference`].
    pub fn new(service_url: impl Into<String>, key_name: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            key_name: key_name.into(),
        }
    }
}

/// Raw RSA public key components, big-endian, as returned by a key service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    /// Modulus `n`.
    pub modulus: Vec<u8>,
    /// Public exponent `e`.
    pub exponent: Vec<u8>,
}

impl PublicKeyMaterial {
    /// Split a parsed RSA public key into its components.
    pub fn from_public_key(key: &RsaPublicKey) -> Self {
        Self {
            modulus: key.n().to_bytes_be(),
            exponent: key.e().to_bytes_be(),
        }
    }
}

/// Failures reported by a [`KeyProvider`].
#[derive(Debug, Error)]
pub enum KeyProviderError {
    /// No key with the requested name exists.
    #[error("key not found: {0}")]
    NotFound(String),

    /// The caller is not permitted to read the key.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The service could not be reached or returned an unexpected failure.
    #[error("key service unavailable: {0}")]
    Unavailable(String),

    /// The key exists but is not an RSA encryption key.
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),
}

/// Supplies public key material for a named key.
///
/// Implementations must not cache across calls and must not fall back to any
/// default key on failure.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Fetch the current public key for `key_ref`.
    async fn fetch_public_key(
        &self,
        key_ref: &KeyReference,
    ) -> Result<PublicKeyMaterial, KeyProviderError>;
}
