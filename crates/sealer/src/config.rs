//! Configuration loading and validation for the sealing service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Per-request timeout applied to every route.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on a single key-management lookup.
    #[serde(default = "default_key_fetch_timeout")]
    pub key_fetch_timeout_secs: u64,

    /// Largest source object (bytes) the service will buffer and seal.
    #[serde(default = "default_max_object_bytes")]
    pub max_object_bytes: u64,

    /// Suffix appended to the source key to name the stored envelope.
    #[serde(default = "default_encrypted_suffix")]
    pub encrypted_suffix: String,

    /// Optional S3 endpoint override for S3-compatible stores.
    #[serde(default)]
    pub s3_endpoint_url: Option<String>,

    /// OTLP endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_key_fetch_timeout() -> u64 {
    10
}
fn default_max_object_bytes() -> u64 {
    64 * 1024 * 1024
}
fn default_encrypted_suffix() -> String {
    ".encrypted".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            request_timeout_secs: default_request_timeout(),
            key_fetch_timeout_secs: default_key_fetch_timeout(),
            max_object_bytes: default_max_object_bytes(),
            encrypted_suffix: default_encrypted_suffix(),
            s3_endpoint_url: None,
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Key-management lookup timeout as a [`Duration`].
    pub fn key_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.key_fetch_timeout_secs)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.key_fetch_timeout_secs == 0 {
            anyhow::bail!("KEY_FETCH_TIMEOUT_SECS must be > 0");
        }
        if self.max_object_bytes == 0 {
            anyhow::bail!("MAX_OBJECT_BYTES must be > 0");
        }
        ensure_non_empty(&self.encrypted_suffix, "ENCRYPTED_SUFFIX")?;
        if let Some(url) = &self.s3_endpoint_url {
            ensure_non_empty(url, "S3_ENDPOINT_URL")?;
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty when set");
    }
    Ok(())
}
