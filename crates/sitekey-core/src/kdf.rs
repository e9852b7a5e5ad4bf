//! PBKDF2 key derivation and HMAC-SHA256 signing.
//!
//! This module provides:
//! - [`pbkdf2`]: PBKDF2 with HMAC-SHA1 as the PRF, caller-chosen cost and length
//! - [`hmac_sha256`]: keyed seed computation
//! - [`Pbkdf2Params`]: named parameter sets for the generator and the cache
//!
//! # Legacy parameters
//!
//! HMAC-SHA1 and the low iteration counts are fixed by the existing body of
//! generated passwords: changing either changes every output. They are not
//! a recommendation for new designs.

use std::num::NonZeroU32;

use ring::{hmac, pbkdf2 as ring_pbkdf2};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::SiteKeyError;
use crate::memory::{SecretBuffer, SecretBytes};

/// HMAC-SHA256 output length in bytes.
pub const SEED_LEN: usize = 32;

/// Largest PBKDF2 output we ever ask for, in bits.
const MAX_OUTPUT_BITS: u32 = 512;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// PBKDF2 cost and output length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pbkdf2Params {
    /// Number of PBKDF2 iterations.
    pub iterations: u32,
    /// Output length in bits; must be a non-zero multiple of 8.
    pub output_bits: u32,
}

impl Pbkdf2Params {
    /// Site key derivation: 750 iterations, 128-bit key.
    pub const GENERATOR: Self = Self {
        iterations: 750,
        output_bits: 128,
    };

    /// Cache encryption key: 500 iterations, 128-bit key.
    pub const CACHE_KEY: Self = Self {
        iterations: 500,
        output_bits: 128,
    };

    /// Cache verification hash: 250 iterations, 128-bit hash.
    pub const CACHE_VERIFY: Self = Self {
        iterations: 250,
        output_bits: 128,
    };

    fn output_len(self) -> Result<usize, SiteKeyError> {
        if self.output_bits == 0 || self.output_bits % 8 != 0 || self.output_bits > MAX_OUTPUT_BITS
        {
            return Err(SiteKeyError::CryptoOperationFailed(format!(
                "invalid PBKDF2 output length: {} bits",
                self.output_bits
            )));
        }
        usize::try_from(self.output_bits / 8)
            .map_err(|_| SiteKeyError::CryptoOperationFailed("output length overflow".into()))
    }
}

// ---------------------------------------------------------------------------
// Core KDF
// ---------------------------------------------------------------------------

/// Derive `params.output_bits` bits from `password` and `salt` with
/// PBKDF2-HMAC-SHA1.
///
/// The intermediate buffer is zeroized after copying into the returned
/// [`SecretBuffer`].
///
/// # Errors
///
/// Returns [`SiteKeyError::CryptoOperationFailed`] if the iteration count is
/// zero or the output length is not a whole number of bytes in `8..=512` bits.
pub fn pbkdf2(
    password: &[u8],
    salt: &[u8],
    params: Pbkdf2Params,
) -> Result<SecretBuffer, SiteKeyError> {
    let iterations = NonZeroU32::new(params.iterations).ok_or_else(|| {
        SiteKeyError::CryptoOperationFailed("PBKDF2 iteration count must be non-zero".into())
    })?;
    let len = params.output_len()?;

    let mut output = vec![0u8; len];
    ring_pbkdf2::derive(
        ring_pbkdf2::PBKDF2_HMAC_SHA1,
        iterations,
        salt,
        password,
        &mut output,
    );

    let result = SecretBuffer::new(&output);
    output.zeroize();
    Ok(result)
}

/// Compute `HMAC-SHA256(key, message)`.
///
/// An empty key is accepted (HMAC pads it), matching the primitive's contract.
#[must_use]
pub fn hmac_sha256(message: &[u8], key: &[u8]) -> SecretBytes<SEED_LEN> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    let tag = hmac::sign(&key, message);

    let mut out = [0u8; SEED_LEN];
    out.copy_from_slice(tag.as_ref());
    let seed = SecretBytes::new(out);
    out.zeroize();
    seed
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
