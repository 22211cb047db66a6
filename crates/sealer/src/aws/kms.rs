//! [`KeyProvider`] backed by AWS KMS `GetPublicKey`.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_kms::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_kms::operation::get_public_key::GetPublicKeyError;
use aws_sdk_kms::types::{KeySpec, KeyUsageType};
use envelope::{KeyProvider, KeyProviderError, KeyReference, PublicKeyMaterial};
use rsa::{pkcs8::DecodePublicKey, RsaPublicKey};
use tracing::{debug, instrument};

/// Resolves RSA public keys from AWS KMS.
///
/// Every call builds a client pointed at the job's `service_url` and issues a
/// fresh `GetPublicKey`; results are never cached.
#[derive(Clone)]
pub struct KmsKeyProvider {
    sdk_config: SdkConfig,
}

impl KmsKeyProvider {
    /// Create a provider using the given SDK configuration for credentials and region.
    pub fn new(sdk_config: SdkConfig) -> Self {
        Self { sdk_config }
    }

    fn client_for(&self, service_url: &str) -> aws_sdk_kms::Client {
        aws_sdk_kms::Client::from_conf(
            aws_sdk_kms::config::Builder::from(&self.sdk_config)
                .endpoint_url(service_url)
                .build(),
        )
    }
}

#[async_trait]
impl KeyProvider for KmsKeyProvider {
    #[instrument(skip_all, fields(key_name = %key_ref.key_name, service_url = %key_ref.service_url))]
    async fn fetch_public_key(
        &self,
        key_ref: &KeyReference,
    ) -> Result<PublicKeyMaterial, KeyProviderError> {
        let resp = self
            .client_for(&key_ref.service_url)
            .get_public_key()
            .key_id(&key_ref.key_name)
            .send()
            .await
            .map_err(|e| classify_error(&key_ref.key_name, e))?;

        check_key_metadata(resp.key_spec(), resp.key_usage())?;

        let der = resp.public_key().ok_or_else(|| {
            KeyProviderError::Unavailable(format!(
                "GetPublicKey for {} returned no key bytes",
                key_ref.key_name
            ))
        })?;
        let material = parse_public_key_der(der.as_ref())?;
        debug!(modulus_len = material.modulus.len(), "public key resolved");
        Ok(material)
    }
}

/// Reject keys KMS reports as non-RSA or not usable for encryption.
fn check_key_metadata(
    spec: Option<&KeySpec>,
    usage: Option<&KeyUsageType>,
) -> Result<(), KeyProviderError> {
    if let Some(spec) = spec {
        if !spec.as_str().starts_with("RSA_") {
            return Err(KeyProviderError::UnsupportedKey(format!(
                "key spec {} is not RSA",
                spec.as_str()
            )));
        }
    }
    if let Some(usage) = usage {
        if *usage != KeyUsageType::EncryptDecrypt {
            return Err(KeyProviderError::UnsupportedKey(format!(
                "key usage {} does not permit encryption",
                usage.as_str()
            )));
        }
    }
    Ok(())
}

/// Split a DER `SubjectPublicKeyInfo` into RSA modulus and exponent.
fn parse_public_key_der(der: &[u8]) -> Result<PublicKeyMaterial, KeyProviderError> {
    let key = RsaPublicKey::from_public_key_der(der).map_err(|e| {
        KeyProviderError::UnsupportedKey(format!("not an RSA SubjectPublicKeyInfo: {e}"))
    })?;
    Ok(PublicKeyMaterial::from_public_key(&key))
}

fn classify_error(key_name: &str, err: SdkError<GetPublicKeyError>) -> KeyProviderError {
    let detail = DisplayErrorContext(&err).to_string();
    match err.as_service_error() {
        Some(e) if e.is_not_found_exception() || e.is_invalid_arn_exception() => {
            KeyProviderError::NotFound(key_name.to_owned())
        }
        Some(e) if e.code() == Some("AccessDeniedException") => {
            KeyProviderError::AccessDenied(format!("{key_name}: {detail}"))
        }
        Some(e) if e.is_invalid_key_usage_exception() || e.is_unsupported_operation_exception() => {
            KeyProviderError::UnsupportedKey(format!("{key_name}: {detail}"))
        }
        _ => KeyProviderError::Unavailable(detail),
    }
}
