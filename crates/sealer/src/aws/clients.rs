//! Shared AWS SDK configuration and the long-lived S3 client.

use aws_config::{BehaviorVersion, SdkConfig};
use tracing::info;

/// AWS SDK configuration plus the clients built from it.
///
/// KMS clients are not kept here: each key lookup targets the service URL
/// named by its job, so [`super::KmsKeyProvider`] builds a client per call
/// from [`AwsClients::sdk_config`].
#[derive(Clone)]
pub struct AwsClients {
    /// Resolved region, credentials provider and retry/timeout defaults.
    pub sdk_config: SdkConfig,
    /// S3 client used to read source objects and write envelopes.
    pub s3: aws_sdk_s3::Client,
}

impl AwsClients {
    /// Load the SDK configuration from the standard AWS provider chain and
    /// build the S3 client.
    ///
    /// When `s3_endpoint_url` is set, S3 requests go to that endpoint with
    /// path-style addressing (S3-compatible stores, local testing).
    pub async fn init(s3_endpoint_url: Option<&str>) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(url) = s3_endpoint_url {
            info!(endpoint = %url, "using S3 endpoint override");
            s3_config = s3_config.endpoint_url(url).force_path_style(true);
        }
        let s3 = aws_sdk_s3::Client::from_conf(s3_config.build());

        Self { sdk_config, s3 }
    }
}
