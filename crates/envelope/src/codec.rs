//! Binary envelope layout.
//!
//! ```text
//! [u32 LE len_key][wrapped_key][u32 LE len_iv][wrapped_iv][ciphertext ...]
//! ```
//!
//! The ciphertext has no length prefix; it is whatever follows the wrapped IV.
//! Consumers depend on this exact field order and prefix width. Any change
//! needs a new, versioned layout.

use crate::error::EnvelopeError;

/// Width of each length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Smallest structurally valid envelope: two empty length-prefixed fields.
pub const MIN_ENVELOPE_LEN: usize = 2 * LENGTH_PREFIX_LEN;

/// The three fields of a decoded envelope, borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeParts<'a> {
    /// RSA-wrapped symmetric key.
    pub wrapped_key: &'a [u8],
    /// RSA-wrapped IV.
    pub wrapped_iv: &'a [u8],
    /// Symmetric ciphertext.
    pub ciphertext: &'a [u8],
}

/// Serialise the three parts into one envelope.
///
/// # Errors
///
/// Returns [`EnvelopeError::MalformedEnvelope`] if a wrapped field is too long
/// for a `u32` length prefix.
pub fn encode(wrapped_key: &[u8], wrapped_iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    let mut out = Vec::with_capacity(
        MIN_ENVELOPE_LEN + wrapped_key.len() + wrapped_iv.len() + ciphertext.len(),
    );
    put_field(&mut out, wrapped_key, "wrapped key")?;
    put_field(&mut out, wrapped_iv, "wrapped IV")?;
    out.extend_from_slice(ciphertext);
    Ok(out)
}

/// Split an envelope back into its parts.
///
/// Every length prefix is bounds-checked against the bytes that remain; the
/// parser never truncates or over-reads.
///
/// # Errors
///
/// Returns [`EnvelopeError::MalformedEnvelope`] if the buffer is shorter than
/// [`MIN_ENVELOPE_LEN`], a prefix is cut off, or a declared length exceeds the
/// remaining bytes.
pub fn decode(envelope: &[u8]) -> Result<EnvelopeParts<'_>, EnvelopeError> {
    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(EnvelopeError::MalformedEnvelope(format!(
            "envelope is {} bytes, at least {MIN_ENVELOPE_LEN} required",
            envelope.len()
        )));
    }
    let (wrapped_key, rest) = take_field(envelope, "wrapped key")?;
    let (wrapped_iv, ciphertext) = take_field(rest, "wrapped IV")?;
    Ok(EnvelopeParts {
        wrapped_key,
        wrapped_iv,
        ciphertext,
    })
}

fn put_field(out: &mut Vec<u8>, field: &[u8], name: &str) -> Result<(), EnvelopeError> {
    let len = u32::try_from(field.len()).map_err(|_| {
        EnvelopeError::MalformedEnvelope(format!(
            "{name} of {} bytes does not fit a u32 length prefix",
            field.len()
        ))
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(field);
    Ok(())
}

fn take_field<'a>(buf: &'a [u8], name: &str) -> Result<(&'a [u8], &'a [u8]), EnvelopeError> {
    let Some((prefix, rest)) = buf.split_first_chunk::<LENGTH_PREFIX_LEN>() else {
        return Err(EnvelopeError::MalformedEnvelope(format!(
            "{name} length prefix truncated: {} bytes remain",
            buf.len()
        )));
    };
    let declared = u32::from_le_bytes(*prefix) as usize;
    if declared > rest.len() {
        return Err(EnvelopeError::MalformedEnvelope(format!(
            "{name} declares {declared} bytes but only {} remain",
            rest.len()
        )));
    }
    Ok(rest.split_at(declared))
}
