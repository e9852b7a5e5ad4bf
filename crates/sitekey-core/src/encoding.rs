//! Hex conversions used between the KDF and cipher stages.

use crate::error::SiteKeyError;
use crate::memory::SecretBuffer;
use zeroize::Zeroizing;

/// Lower-case hex encoding.
///
/// Returned as [`Zeroizing`] because the input is usually key material.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> Zeroizing<String> {
    Zeroizing::new(hex::encode(bytes))
}

/// Case-insensitive hex decoding.
///
/// # Errors
///
/// Returns [`SiteKeyError::CryptoOperationFailed`] on odd length or a
/// non-hex character.
pub fn from_hex(text: &str) -> Result<SecretBuffer, SiteKeyError> {
    hex::decode(text)
        .map(SecretBuffer::from_vec)
        .map_err(|e| SiteKeyError::CryptoOperationFailed(format!("invalid hex: {e}")))
}
