//! AWS-backed collaborators: KMS for public keys, S3 for objects.
//!
//! Credentials are resolved once at startup into an [`aws_config::SdkConfig`]
//! and handed explicitly to each adapter; nothing reads process-global client
//! state per request.

pub mod clients;
pub mod kms;
pub mod s3;

pub use clients::AwsClients;
pub use kms::KmsKeyProvider;
pub use s3::S3ObjectStore;
