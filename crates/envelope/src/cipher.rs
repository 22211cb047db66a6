//! AES-256-CBC payload encryption with PKCS#7 padding.
//!
//! **No integrity protection.** CBC without a MAC is malleable; tampered
//! ciphertext is not detected beyond a possible padding error. The envelope
//! format has no room for a tag, so this cannot be added without versioning
//! the format.
//!
//! **Never reuse a key/IV pair.** Every call to [`generate_key`] draws fresh
//! material from the OS CSPRNG.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rsa::rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::EnvelopeError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialisation vector (one AES block).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// One-time symmetric key and IV.
///
/// Not `Clone`: a single owner holds the material for the duration of one
/// operation. Both buffers are overwritten with zeroes on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKeyMaterial {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl SymmetricKeyMaterial {
    /// Rebuild key material from unwrapped key and IV bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::CryptoFailure`] if either slice has the wrong length.
    pub fn from_parts(key: &[u8], iv: &[u8]) -> Result<Self, EnvelopeError> {
        if key.len() != KEY_LEN {
            return Err(EnvelopeError::CryptoFailure(format!(
                "symmetric key must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        if iv.len() != IV_LEN {
            return Err(EnvelopeError::CryptoFailure(format!(
                "IV must be {IV_LEN} bytes, got {}",
                iv.len()
            )));
        }
        let mut material = Self::zeroed();
        material.key.copy_from_slice(key);
        material.iv.copy_from_slice(iv);
        Ok(material)
    }

    /// The 256-bit key.
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// The 128-bit IV.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    fn zeroed() -> Self {
        Self {
            key: [0u8; KEY_LEN],
            iv: [0u8; IV_LEN],
        }
    }
}

impl std::fmt::Debug for SymmetricKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.write_str("SymmetricKeyMaterial([REDACTED])")
    }
}

/// Generate a fresh 256-bit key and 128-bit IV from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`EnvelopeError::CryptoFailure`] if the entropy source fails.
pub fn generate_key() -> Result<SymmetricKeyMaterial, EnvelopeError> {
    // Zeroed on drop even if the second fill fails.
    let mut material = SymmetricKeyMaterial::zeroed();
    OsRng
        .try_fill_bytes(&mut material.key)
        .map_err(|e| EnvelopeError::CryptoFailure(format!("entropy source failed: {e}")))?;
    OsRng
        .try_fill_bytes(&mut material.iv)
        .map_err(|e| EnvelopeError::CryptoFailure(format!("entropy source failed: {e}")))?;
    Ok(material)
}

/// Encrypt `plaintext` with AES-256-CBC and PKCS#7 padding.
///
/// The output is always a whole number of blocks and at least one block
/// longer than any block-aligned input: `(len / 16 + 1) * 16` bytes.
///
/// # Errors
///
/// Returns [`EnvelopeError::CryptoFailure`] if the cipher rejects the key or IV.
pub fn encrypt(plaintext: &[u8], material: &SymmetricKeyMaterial) -> Result<Vec<u8>, EnvelopeError> {
    let encryptor = Aes256CbcEnc::new_from_slices(&material.key, &material.iv).map_err(|_| {
        EnvelopeError::CryptoFailure("cipher backend rejected key or IV length".into())
    })?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC ciphertext and strip its PKCS#7 padding.
///
/// A wrong key usually surfaces as a padding error, but not always: without
/// integrity protection a wrong key can also yield garbage with valid padding.
///
/// # Errors
///
/// Returns [`EnvelopeError::CryptoFailure`] if the ciphertext is empty, not
/// block-aligned, or carries invalid padding.
pub fn decrypt(ciphertext: &[u8], material: &SymmetricKeyMaterial) -> Result<Vec<u8>, EnvelopeError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(EnvelopeError::CryptoFailure(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            ciphertext.len()
        )));
    }
    let decryptor = Aes256CbcDec::new_from_slices(&material.key, &material.iv).map_err(|_| {
        EnvelopeError::CryptoFailure("cipher backend rejected key or IV length".into())
    })?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EnvelopeError::CryptoFailure("invalid PKCS#7 padding".into()))
}
