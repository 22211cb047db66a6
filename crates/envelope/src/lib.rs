//! Hybrid-encryption envelope engine.
//!
//! A payload is sealed by:
//! 1. generating a one-time AES-256 key and IV ([`cipher`]),
//! 2. encrypting the payload with AES-256-CBC / PKCS#7,
//! 3. resolving an RSA public key through a [`KeyProvider`],
//! 4. wrapping the key and the IV separately with RSA-OAEP-SHA256 ([`wrap`]),
//! 5. concatenating everything into one envelope ([`codec`]).
//!
//! # Envelope layout
//!
//! ```text
//! [u32 LE len_key][wrapped_key][u32 LE len_iv][wrapped_iv][ciphertext ...]
//! ```
//!
//! No magic number, version tag, or integrity tag. The ciphertext is not
//! authenticated: a tampered envelope decrypts to garbage (or fails on
//! padding) rather than being rejected up front.
//!
//! # Security invariants
//!
//! - The symmetric key and IV are zeroed on drop on every exit path and are
//!   never logged or returned to callers of [`EncryptionPipeline::seal_payload`].
//! - Public keys are resolved fresh for every operation; nothing is cached.

pub mod cipher;
pub mod codec;
pub mod error;
pub mod keys;
pub mod pipeline;
pub mod wrap;

pub use error::EnvelopeError;
pub use keys::{KeyProvider, KeyProviderError, KeyReference, PublicKeyMaterial};
pub use pipeline::{open_envelope, EncryptionPipeline};

#[cfg(any(test, feature = "mock"))]
pub use keys::MockKeyProvider;

#[cfg(test)]
pub(crate) mod test_keys {
    use std::sync::OnceLock;

    use rsa::{rand_core::OsRng, RsaPrivateKey};

    /// Shared 2048-bit key pair; generating one per test is slow in debug builds.
    pub fn rsa_2048() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).unwrap())
    }

    /// Shared 1024-bit key pair for capacity-boundary checks.
    pub fn rsa_1024() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).unwrap())
    }
}
