//! Temporary encrypted pass phrase cache.
//!
//! The host caches the pass phrase after use and clears its own field. To
//! get it back the user retypes only the first three characters (the
//! prefix). The prefix and identity derive both the AES key and a
//! verification hash:
//!
//! ```text
//! key1   = PBKDF2-HMAC-SHA1(identity + prefix, identity + "sitekey.cache", 500, 128 bits)
//! verify = hex(PBKDF2-HMAC-SHA1(hex(key1), identity + prefix, 250, 128 bits))
//! sealed = AES-CBC(phrase, key = key1, random IV)
//! ```
//!
//! A wrong prefix clears the cache, so there is exactly one guess per cached
//! phrase.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::encoding::to_hex;
use crate::error::SiteKeyError;
use crate::kdf::{self, Pbkdf2Params};
use crate::symmetric::{self, EncryptedPhrase};

/// Salt suffix for the cache encryption key.
pub const CACHE_NAMESPACE: &str = "sitekey.cache";

/// Number of leading pass phrase characters used to unlock the cache.
pub const PREFIX_CHARS: usize = 3;

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Externally observable cache state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// Nothing cached.
    Editing,
    /// A pass phrase is encrypted in the cache.
    Stored,
    /// The last unlock attempt failed and the cache was cleared.
    Failed,
}

/// Verification hash and encrypted phrase. Always present together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CachedPhrase {
    /// Lower-case hex verification hash.
    pub verification_hash: String,
    pub encrypted: EncryptedPhrase,
}

impl fmt::Debug for CachedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedPhrase")
            .field("verification_hash", &"***")
            .field("ciphertext_len", &self.encrypted.ciphertext.len())
            .finish()
    }
}

/// Holds at most one encrypted pass phrase.
///
/// All methods take `&mut self`; one cache instance is never shared.
#[derive(Default)]
pub struct PhraseCache {
    stored: Option<CachedPhrase>,
    failed: bool,
}

impl fmt::Debug for PhraseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhraseCache")
            .field("state", &self.state())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// First [`PREFIX_CHARS`] characters of `phrase`, or `None` if it is shorter.
fn prefix_of(phrase: &str) -> Option<&str> {
    let end = match phrase.char_indices().nth(PREFIX_CHARS) {
        Some((index, _)) => index,
        None if phrase.chars().count() == PREFIX_CHARS => phrase.len(),
        None => return None,
    };
    phrase.get(..end)
}

fn check_prefix(prefix: &str) -> Result<(), SiteKeyError> {
    if prefix.chars().count() == PREFIX_CHARS {
        Ok(())
    } else {
        Err(SiteKeyError::InvalidPrefixFormat)
    }
}

/// Hex of the cache encryption key.
fn cache_key_hex(identity: &str, prefix: &str) -> Result<Zeroizing<String>, SiteKeyError> {
    let password = Zeroizing::new(format!("{identity}{prefix}"));
    let salt = format!("{identity}{CACHE_NAMESPACE}");
    let mut key = kdf::pbkdf2(password.as_bytes(), salt.as_bytes(), Pbkdf2Params::CACHE_KEY)?;
    let hex = to_hex(key.expose());
    key.zeroize();
    Ok(hex)
}

fn hash_from_key(key_hex: &str, identity: &str, prefix: &str) -> Result<String, SiteKeyError> {
    let salt = Zeroizing::new(format!("{identity}{prefix}"));
    let hash = kdf::pbkdf2(key_hex.as_bytes(), salt.as_bytes(), Pbkdf2Params::CACHE_VERIFY)?;
    Ok(to_hex(hash.expose()).as_str().to_owned())
}

/// Verification hash for `prefix` and `identity`.
///
/// The identity is used exactly as given; callers that normalize it must do
/// so the same way for every cache call.
///
/// # Errors
///
/// Returns [`SiteKeyError::InvalidPrefixFormat`] unless `prefix` is exactly
/// three characters, or [`SiteKeyError::CryptoOperationFailed`] if PBKDF2
/// fails.
pub fn verification_hash(prefix: &str, identity: &str) -> Result<String, SiteKeyError> {
    check_prefix(prefix)?;
    let key_hex = cache_key_hex(identity, prefix)?;
    hash_from_key(&key_hex, identity, prefix)
}

// ---------------------------------------------------------------------------
// PhraseCache
// ---------------------------------------------------------------------------

impl PhraseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> CacheState {
        if self.failed {
            CacheState::Failed
        } else if self.stored.is_some() {
            CacheState::Stored
        } else {
            CacheState::Editing
        }
    }

    /// Encrypt `passphrase` into the cache, replacing anything already there.
    ///
    /// # Errors
    ///
    /// Returns [`SiteKeyError::PhraseTooShort`] for fewer than three
    /// characters, or [`SiteKeyError::CryptoOperationFailed`] if a primitive
    /// fails. The previous contents are kept on error.
    pub fn encrypt(&mut self, passphrase: &str, identity: &str) -> Result<(), SiteKeyError> {
        self.failed = false;
        let prefix = prefix_of(passphrase).ok_or(SiteKeyError::PhraseTooShort)?;

        let key_hex = cache_key_hex(identity, prefix)?;
        let verification_hash = hash_from_key(&key_hex, identity, prefix)?;
        let encrypted = symmetric::encrypt(passphrase.as_bytes(), &key_hex)?;

        self.stored = Some(CachedPhrase {
            verification_hash,
            encrypted,
        });
        tracing::debug!("pass phrase cached");
        Ok(())
    }

    /// Recover the cached pass phrase from its first three characters.
    ///
    /// The cache keeps its contents on success.
    ///
    /// # Errors
    ///
    /// - [`SiteKeyError::NoDataStored`] if the cache is empty
    /// - [`SiteKeyError::InvalidPrefixFormat`] unless `prefix` is exactly
    ///   three characters
    /// - [`SiteKeyError::PrefixMismatch`] if verification fails; the cache is
    ///   cleared and the state becomes [`CacheState::Failed`]
    /// - [`SiteKeyError::CryptoOperationFailed`] if decryption fails or the
    ///   plaintext is not UTF-8
    pub fn decrypt(
        &mut self,
        prefix: &str,
        identity: &str,
    ) -> Result<Zeroizing<String>, SiteKeyError> {
        let Some(stored) = self.stored.as_ref() else {
            return Err(SiteKeyError::NoDataStored);
        };
        check_prefix(prefix)?;

        let key_hex = cache_key_hex(identity, prefix)?;
        let candidate = hash_from_key(&key_hex, identity, prefix)?;
        if !constant_time_eq(
            candidate.as_bytes(),
            stored.verification_hash.as_bytes(),
        ) {
            self.stored = None;
            self.failed = true;
            tracing::warn!("cache unlock failed; stored pass phrase cleared");
            return Err(SiteKeyError::PrefixMismatch);
        }

        let plaintext = symmetric::decrypt(&stored.encrypted, &key_hex)?;
        let phrase = std::str::from_utf8(plaintext.expose()).map_err(|_| {
            SiteKeyError::CryptoOperationFailed("cached pass phrase is not valid UTF-8".into())
        })?;
        Ok(Zeroizing::new(phrase.to_owned()))
    }

    /// Zeroize and discard the cached values. Idempotent.
    pub fn clear_store(&mut self) {
        let had_data = self.stored.take().is_some();
        self.failed = false;
        if had_data {
            tracing::debug!("pass phrase cache cleared");
        }
    }

    /// Load values a host persisted earlier with [`Self::stored_values`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteKeyError::NoDataStored`] if the hash or ciphertext is
    /// empty; the cache is left unchanged.
    pub fn store_values(
        &mut self,
        verification_hash: &str,
        encrypted: EncryptedPhrase,
    ) -> Result<(), SiteKeyError> {
        self.failed = false;
        if verification_hash.is_empty() || encrypted.ciphertext.is_empty() {
            return Err(SiteKeyError::NoDataStored);
        }
        self.stored = Some(CachedPhrase {
            verification_hash: verification_hash.to_ascii_lowercase(),
            encrypted,
        });
        tracing::debug!("pass phrase cache restored");
        Ok(())
    }

    /// Verification hash and encrypted phrase, for the host to persist.
    #[must_use]
    pub fn stored_values(&self) -> Option<(&str, &EncryptedPhrase)> {
        self.stored
            .as_ref()
            .map(|c| (c.verification_hash.as_str(), &c.encrypted))
    }

    /// Return from [`CacheState::Failed`] to [`CacheState::Editing`].
    pub fn acknowledge_failure(&mut self) {
        self.failed = false;
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
