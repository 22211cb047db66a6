//! Common error types shared across crates.

use thiserror::Error;

/// Top-level error category reported for a sealing job.
///
/// Every failure in the service collapses into exactly one of these variants;
/// no partial success is representable. Variants map to HTTP status codes:
/// - [`SealError::InputInvalid`], [`SealError::MalformedEnvelope`] → 400
/// - [`SealError::SourceNotFound`] → 404
/// - [`SealError::CryptoFailure`], [`SealError::SecretTooLarge`] → 500
/// - [`SealError::KeyResolutionFailure`], [`SealError::InvalidKeyMaterial`],
///   [`SealError::DestinationWriteFailure`] → 502
#[derive(Debug, Error)]
pub enum SealError {
    /// The job description is missing, unparseable, or has invalid fields.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// The source object could not be fetched from object storage.
    #[error("source object not found: {0}")]
    SourceNotFound(String),

    /// The entropy source or the cipher backend failed.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),

    /// The key-management lookup failed (not found, unauthorized, unreachable).
    #[error("key resolution failure: {0}")]
    KeyResolutionFailure(String),

    /// The resolved public key is not usable for wrapping.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// A secret exceeds the wrapping capacity of the public key.
    #[error("secret too large: {0}")]
    SecretTooLarge(String),

    /// An envelope violates the binary layout.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Storing the sealed envelope failed.
    #[error("destination write failure: {0}")]
    DestinationWriteFailure(String),
}

impl SealError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            SealError::InputInvalid(_) | SealError::MalformedEnvelope(_) => 400,
            SealError::SourceNotFound(_) => 404,
            SealError::CryptoFailure(_) | SealError::SecretTooLarge(_) => 500,
            SealError::KeyResolutionFailure(_)
            | SealError::InvalidKeyMaterial(_)
            | SealError::DestinationWriteFailure(_) => 502,
        }
    }

    /// Short machine-readable category, used as the `code` of an error response.
    pub fn code(&self) -> &'static str {
        match self {
            SealError::InputInvalid(_) => "input_invalid",
            SealError::SourceNotFound(_) => "source_not_found",
            SealError::CryptoFailure(_) => "crypto_failure",
            SealError::KeyResolutionFailure(_) => "key_resolution_failure",
            SealError::InvalidKeyMaterial(_) => "invalid_key_material",
            SealError::SecretTooLarge(_) => "secret_too_large",
            SealError::MalformedEnvelope(_) => "malformed_envelope",
            SealError::DestinationWriteFailure(_) => "destination_write_failure",
        }
    }
}
