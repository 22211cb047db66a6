//! RSA-OAEP-SHA256 wrapping of short secrets.

use rsa::{rand_core::OsRng, traits::PublicKeyParts, BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::EnvelopeError;
use crate::keys::PublicKeyMaterial;

/// SHA-256 digest length; OAEP spends two of these plus two bytes per block.
const HASH_LEN: usize = 32;

/// Smallest modulus accepted for wrapping.
pub const MIN_MODULUS_BITS: usize = 1024;

/// Largest modulus accepted for wrapping.
pub const MAX_MODULUS_BITS: usize = 16384;

/// Build an RSA public key from raw modulus/exponent bytes.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidKeyMaterial`] if either component is empty,
/// the modulus is outside [`MIN_MODULUS_BITS`]..=[`MAX_MODULUS_BITS`], or the
/// components are rejected by the RSA backend.
pub fn public_key_from_material(material: &PublicKeyMaterial) -> Result<RsaPublicKey, EnvelopeError> {
    let n = BigUint::from_bytes_be(&material.modulus);
    let e = BigUint::from_bytes_be(&material.exponent);
    if n.bits() == 0 || e.bits() == 0 {
        return Err(EnvelopeError::InvalidKeyMaterial(
            "modulus and exponent must be non-zero".into(),
        ));
    }
    if n.bits() < MIN_MODULUS_BITS {
        return Err(EnvelopeError::InvalidKeyMaterial(format!(
            "modulus of {} bits is below the {MIN_MODULUS_BITS}-bit minimum",
            n.bits()
        )));
    }
    RsaPublicKey::new_with_max_size(n, e, MAX_MODULUS_BITS)
        .map_err(|e| EnvelopeError::InvalidKeyMaterial(e.to_string()))
}

/// Largest secret `key` can wrap under OAEP-SHA256: `k - 2 * 32 - 2` bytes.
pub fn max_secret_len(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(2 * HASH_LEN + 2)
}

/// Wrap `secret` under `key` with RSA-OAEP-SHA256.
///
/// The output is exactly the modulus length (256 bytes for a 2048-bit key).
///
/// # Errors
///
/// Returns [`EnvelopeError::SecretTooLarge`] if `secret` exceeds
/// [`max_secret_len`], or [`EnvelopeError::CryptoFailure`] if encryption fails.
pub fn wrap(secret: &[u8], key: &RsaPublicKey) -> Result<Vec<u8>, EnvelopeError> {
    let max = max_secret_len(key);
    if secret.len() > max {
        return Err(EnvelopeError::SecretTooLarge {
            len: secret.len(),
            max,
        });
    }
    key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), secret)
        .map_err(|e| EnvelopeError::CryptoFailure(format!("OAEP wrap failed: {e}")))
}

/// Recover a secret wrapped by [`wrap`].
///
/// # Errors
///
/// Returns [`EnvelopeError::CryptoFailure`] if the wrapped bytes do not
/// decrypt under `key`.
pub fn unwrap(wrapped: &[u8], key: &RsaPrivateKey) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
    key.decrypt(Oaep::new::<Sha256>(), wrapped)
        .map(Zeroizing::new)
        .map_err(|e| EnvelopeError::CryptoFailure(format!("OAEP unwrap failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{IV_LEN, KEY_LEN};
    use crate::test_keys;

    #[test]
    fn wrap_unwrap_round_trip() {
        let private = test_keys::rsa_2048();
        let public = RsaPublicKey::from(private);
        let secret = [0x5Au8; KEY_LEN];
        let wrapped = wrap(&secret, &public).unwrap();
        assert_eq!(wrapped.len(), 256);
        assert_eq!(unwrap(&wrapped, private).unwrap().as_slice(), &secret);
    }

    #[test]
    fn capacity_matches_oaep_sha256() {
        let public = RsaPublicKey::from(test_keys::rsa_2048());
        assert_eq!(max_secret_len(&public), 190);
        let public = RsaPublicKey::from(test_keys::rsa_1024());
        assert_eq!(max_secret_len(&public), 62);
    }

    #[test]
    fn accepts_secret_at_capacity() {
        let public = RsaPublicKey::from(test_keys::rsa_2048());
        assert!(wrap(&[1u8; 190], &public).is_ok());
    }

    #[test]
    fn rejects_secret_over_capacity() {
        let public = RsaPublicKey::from(test_keys::rsa_2048());
        let err = wrap(&[1u8; 191], &public).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::SecretTooLarge { len: 191, max: 190 }
        ));
    }

    #[test]
    fn small_key_still_wraps_symmetric_material() {
        let public = RsaPublicKey::from(test_keys::rsa_1024());
        assert_eq!(wrap(&[7u8; KEY_LEN], &public).unwrap().len(), 128);
        assert_eq!(wrap(&[7u8; IV_LEN], &public).unwrap().len(), 128);
        assert!(matches!(
            wrap(&[7u8; 63], &public),
            Err(EnvelopeError::SecretTooLarge { .. })
        ));
    }

    #[test]
    fn accepts_moduli_above_4096_bits() {
        let material = PublicKeyMaterial {
            modulus: vec![0xFF; 1024],
            exponent: vec![0x01, 0x00, 0x01],
        };
        let public = public_key_from_material(&material).unwrap();
        assert_eq!(public.size(), 1024);
        assert_eq!(wrap(&[7u8; KEY_LEN], &public).unwrap().len(), 1024);
    }

    #[test]
    fn rejects_modulus_over_maximum() {
        let material = PublicKeyMaterial {
            modulus: vec![0xFF; MAX_MODULUS_BITS / 8 + 1],
            exponent: vec![0x01, 0x00, 0x01],
        };
        assert!(matches!(
            public_key_from_material(&material),
            Err(EnvelopeError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn wrapping_is_randomised() {
        let public = RsaPublicKey::from(test_keys::rsa_2048());
        let secret = [9u8; KEY_LEN];
        assert_ne!(wrap(&secret, &public).unwrap(), wrap(&secret, &public).unwrap());
    }

    #[test]
    fn material_round_trips_to_public_key() {
        let public = RsaPublicKey::from(test_keys::rsa_2048());
        let material = PublicKeyMaterial::from_public_key(&public);
        assert_eq!(public_key_from_material(&material).unwrap(), public);
    }

    #[test]
    fn rejects_empty_components() {
        let material = PublicKeyMaterial {
            modulus: vec![],
            exponent: vec![0x01, 0x00, 0x01],
        };
        assert!(matches!(
            public_key_from_material(&material),
            Err(EnvelopeError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn rejects_short_modulus() {
        let material = PublicKeyMaterial {
            modulus: vec![0xFF; 64],
            exponent: vec![0x01, 0x00, 0x01],
        };
        assert!(matches!(
            public_key_from_material(&material),
            Err(EnvelopeError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn rejects_exponent_of_one() {
        let public = RsaPublicKey::from(test_keys::rsa_2048());
        let mut material = PublicKeyMaterial::from_public_key(&public);
        material.exponent = vec![0x01];
        assert!(matches!(
            public_key_from_material(&material),
            Err(EnvelopeError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn unwrap_with_wrong_key_fails() {
        let public = RsaPublicKey::from(test_keys::rsa_2048());
        let wrapped = wrap(&[3u8; KEY_LEN], &public).unwrap();
        assert!(unwrap(&wrapped, test_keys::rsa_1024()).is_err());
    }
}
