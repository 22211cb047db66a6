//! Request and response types exchanged over the public HTTP API.
//!
//! All types are serialised as JSON.

use serde::{Deserialize, Serialize};

use crate::error::SealError;

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`: a single sealing job.
///
/// Names the source object to seal and the key-management key whose public
/// half wraps the one-time symmetric key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealRequest {
    /// Bucket holding the source object. The envelope is written to the same bucket.
    pub bucket: String,
    /// Key of the source object.
    pub object_key: String,
    /// Base URL of the key-management service holding the wrapping key.
    pub key_service_url: String,
    /// Name (or id) of the asymmetric key within the key-management service.
    pub key_name: String,
}

impl SealRequest {
    /// Check that every field is present and usable.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::InputInvalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SealError> {
        for (value, name) in [
            (&self.bucket, "bucket"),
            (&self.object_key, "object_key"),
            (&self.key_service_url, "key_service_url"),
            (&self.key_name, "key_name"),
        ] {
            if value.trim().is_empty() {
                return Err(SealError::InputInvalid(format!(
                    "{name} is required and must not be empty"
                )));
            }
        }

        let url = self.key_service_url.as_str();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
            _ => Err(SealError::InputInvalid(
                "key_service_url must be an absolute http(s) URL".into(),
            )),
        }
    }
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealResponse {
    /// Key under which the envelope was stored.
    pub object_key: String,
    /// Human-readable status line.
    pub message: String,
}

impl SealResponse {
    /// Build the response for an envelope stored under `object_key`.
    pub fn stored(object_key: impl Into<String>) -> Self {
        let object_key = object_key.into();
        Self {
            message: format!("Encrypted file uploaded as {object_key}"),
            object_key,
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"input_invalid"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&SealError> for ErrorResponse {
    fn from(err: &SealError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
}
