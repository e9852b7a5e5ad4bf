//! AES-CBC encryption of a cached pass phrase.
//!
//! This module provides:
//! - [`encrypt`]: encrypt plaintext under a hex key with a fresh random IV
//! - [`decrypt`]: decrypt an [`EncryptedPhrase`], returning [`SecretBuffer`]
//! - [`EncryptedPhrase`]: IV + ciphertext container (serializable)
//!
//! The key is given as hex text; its decoded length picks AES-128, AES-192 or
//! AES-256. Padding is PKCS#7. CBC has no authentication tag: integrity of
//! the cache comes from the verification hash checked before decryption.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    block_padding::Pkcs7, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::from_hex;
use crate::error::SiteKeyError;
use crate::memory::SecretBuffer;

/// AES block and IV length in bytes.
pub const IV_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// IV + ciphertext produced by [`encrypt`].
///
/// Wire format: `iv (16 bytes) || ciphertext (multiple of 16 bytes)`.
#[must_use = "encrypted data must be stored"]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct EncryptedPhrase {
    /// 128-bit random IV, unique per encryption.
    pub iv: [u8; IV_LEN],
    /// PKCS#7-padded AES-CBC ciphertext.
    pub ciphertext: Vec<u8>,
}

impl EncryptedPhrase {
    /// Serialize to wire format: `iv || ciphertext`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN.saturating_add(self.ciphertext.len()));
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Deserialize from wire format: `iv || ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteKeyError::CryptoOperationFailed`] if there is no full
    /// ciphertext block after the IV, or the ciphertext is not block-aligned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SiteKeyError> {
        let Some((iv_bytes, ciphertext)) = bytes.split_first_chunk::<IV_LEN>() else {
            return Err(SiteKeyError::CryptoOperationFailed(format!(
                "encrypted phrase too short: {} bytes",
                bytes.len()
            )));
        };
        if ciphertext.is_empty() || ciphertext.len() % IV_LEN != 0 {
            return Err(SiteKeyError::CryptoOperationFailed(format!(
                "ciphertext length {} is not a positive multiple of {IV_LEN}",
                ciphertext.len()
            )));
        }
        Ok(Self {
            iv: *iv_bytes,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Core encryption
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` with AES-CBC under `key_hex` and a fresh random IV.
///
/// # Errors
///
/// Returns [`SiteKeyError::CryptoOperationFailed`] if `key_hex` is not valid
/// hex or does not decode to 16, 24 or 32 bytes.
pub fn encrypt(plaintext: &[u8], key_hex: &str) -> Result<EncryptedPhrase, SiteKeyError> {
    let key = from_hex(key_hex)?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = match key.len() {
        16 => seal::<Aes128>(key.expose(), &iv, plaintext)?,
        24 => seal::<Aes192>(key.expose(), &iv, plaintext)?,
        32 => seal::<Aes256>(key.expose(), &iv, plaintext)?,
        other => return Err(invalid_key_length(other)),
    };

    Ok(EncryptedPhrase { iv, ciphertext })
}

/// Decrypt an [`EncryptedPhrase`] under `key_hex`.
///
/// Returns the plaintext as a [`SecretBuffer`]; the intermediate buffer is
/// zeroized.
///
/// # Errors
///
/// Returns [`SiteKeyError::CryptoOperationFailed`] if the key is malformed or
/// the padding does not check out (wrong key or corrupted ciphertext).
pub fn decrypt(sealed: &EncryptedPhrase, key_hex: &str) -> Result<SecretBuffer, SiteKeyError> {
    let key = from_hex(key_hex)?;

    let mut plaintext = match key.len() {
        16 => open::<Aes128>(key.expose(), &sealed.iv, &sealed.ciphertext)?,
        24 => open::<Aes192>(key.expose(), &sealed.iv, &sealed.ciphertext)?,
        32 => open::<Aes256>(key.expose(), &sealed.iv, &sealed.ciphertext)?,
        other => return Err(invalid_key_length(other)),
    };

    let result = SecretBuffer::new(&plaintext);
    plaintext.zeroize();
    Ok(result)
}

fn seal<C>(key: &[u8], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>, SiteKeyError>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| SiteKeyError::CryptoOperationFailed("failed to create AES-CBC key".into()))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn open<C>(key: &[u8], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, SiteKeyError>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| SiteKeyError::CryptoOperationFailed("failed to create AES-CBC key".into()))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SiteKeyError::CryptoOperationFailed("AES-CBC padding check failed".into()))
}

fn invalid_key_length(len: usize) -> SiteKeyError {
    SiteKeyError::CryptoOperationFailed(format!(
        "invalid AES key length: {len} bytes (expected 16, 24 or 32)"
    ))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// 16-byte key as the cache produces it: hex of a 128-bit PBKDF2 output.
    const TEST_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f";

    const WRONG_KEY_HEX: &str = "0f0e0d0c0b0a09080706050403020100";

    #[test]
    fn nist_sp800_38a_cbc_aes128_first_block() {
        // F.2.1 CBC-AES128.Encrypt, block #1. Padding adds a second block.
        let key = "2b7e151628aed2a6abf7158809cf4f3c";
        let iv: [u8; 16] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let ct = seal::<Aes128>(&hex::decode(key).unwrap(), &iv, &plaintext).unwrap();
        assert_eq!(ct.len(), 32);
        assert_eq!(hex::encode(&ct[..16]), "7649abac8119b246cee98e9b12e9197d");
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let sealed = encrypt(b"My pass phrase", TEST_KEY_HEX).unwrap();
        let decrypted = decrypt(&sealed, TEST_KEY_HEX).unwrap();
        assert_eq!(decrypted.expose(), b"My pass phrase");
    }

    #[test]
    fn upper_case_key_hex_decrypts() {
        let sealed = encrypt(b"phrase", TEST_KEY_HEX).unwrap();
        let decrypted = decrypt(&sealed, &TEST_KEY_HEX.to_uppercase()).unwrap();
        assert_eq!(decrypted.expose(), b"phrase");
    }

    #[test]
    fn ciphertext_is_padded_to_block() {
        let sealed = encrypt(b"16 bytes exactly", TEST_KEY_HEX).unwrap();
        assert_eq!(sealed.ciphertext.len(), 32);
        let sealed = encrypt(b"short", TEST_KEY_HEX).unwrap();
        assert_eq!(sealed.ciphertext.len(), 16);
    }

    #[test]
    fn aes256_key_roundtrip() {
        let key = "aa".repeat(32);
        let sealed = encrypt(b"long key", &key).unwrap();
        assert_eq!(decrypt(&sealed, &key).unwrap().expose(), b"long key");
    }

    #[test]
    fn two_encrypts_produce_different_ivs() {
        let a = encrypt(b"same data", TEST_KEY_HEX).unwrap();
        let b = encrypt(b"same data", TEST_KEY_HEX).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn wrong_key_does_not_return_plaintext() {
        let sealed = encrypt(b"My pass phrase", TEST_KEY_HEX).unwrap();
        match decrypt(&sealed, WRONG_KEY_HEX) {
            Ok(buf) => assert_ne!(buf.expose(), b"My pass phrase"),
            Err(e) => assert!(matches!(e, SiteKeyError::CryptoOperationFailed(_))),
        }
    }

    #[test]
    fn encrypt_rejects_bad_key_length() {
        let err = encrypt(b"x", "0011").unwrap_err();
        assert!(err.to_string().contains("invalid AES key length"));
    }

    #[test]
    fn encrypt_rejects_non_hex_key() {
        let err = encrypt(b"x", "not hex at all!!").unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
    }

    #[test]
    fn bytes_roundtrip() {
        let sealed = encrypt(b"wire format", TEST_KEY_HEX).unwrap();
        let restored = EncryptedPhrase::from_bytes(&sealed.to_bytes()).unwrap();
        assert_eq!(sealed, restored);
    }

    #[test]
    fn from_bytes_rejects_short_or_unaligned() {
        assert!(EncryptedPhrase::from_bytes(&[0u8; 16]).is_err());
        assert!(EncryptedPhrase::from_bytes(&[0u8; 20]).is_err());
        assert!(EncryptedPhrase::from_bytes(&[0u8; 32]).is_ok());
    }

    #[test]
    fn serde_roundtrip() {
        let sealed = encrypt(b"serde", TEST_KEY_HEX).unwrap();
        let json = serde_json::to_string(&sealed).unwrap();
        let restored: EncryptedPhrase = serde_json::from_str(&json).unwrap();
        assert_eq!(sealed, restored);
    }
}
