#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for PBKDF2 and HMAC-SHA256.

use proptest::prelude::*;
use sitekey_core::kdf::{hmac_sha256, pbkdf2, Pbkdf2Params, SEED_LEN};

/// Cheap params for property tests.
const PROP_PARAMS: Pbkdf2Params = Pbkdf2Params {
    iterations: 2,
    output_bits: 128,
};

proptest! {
    /// Output length follows `output_bits` for every whole-byte size.
    #[test]
    fn pbkdf2_output_length(
        password in proptest::collection::vec(any::<u8>(), 0..64),
        bytes in 1u32..=64,
    ) {
        let params = Pbkdf2Params { iterations: 1, output_bits: bytes * 8 };
        let key = pbkdf2(&password, b"salt", params).expect("pbkdf2 should succeed");
        prop_assert_eq!(key.len(), bytes as usize);
    }

    /// Different salts give different keys.
    #[test]
    fn pbkdf2_salt_separates(
        password in proptest::collection::vec(any::<u8>(), 1..64),
        salt_a in "[a-z]{1,16}",
        salt_b in "[a-z]{1,16}",
    ) {
        prop_assume!(salt_a != salt_b);
        let a = pbkdf2(&password, salt_a.as_bytes(), PROP_PARAMS).unwrap();
        let b = pbkdf2(&password, salt_b.as_bytes(), PROP_PARAMS).unwrap();
        prop_assert_ne!(a.expose(), b.expose());
    }

    /// HMAC output is always a full seed and deterministic.
    #[test]
    fn hmac_deterministic(
        key in proptest::collection::vec(any::<u8>(), 0..80),
        message in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        let a = hmac_sha256(&message, &key);
        let b = hmac_sha256(&message, &key);
        prop_assert_eq!(a.expose().len(), SEED_LEN);
        prop_assert_eq!(a.expose(), b.expose());
    }
}
