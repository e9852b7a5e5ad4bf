#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for the pass phrase cache, including persistence
//! through `stored_values` → wire bytes → `store_values`.

use proptest::prelude::*;
use sitekey_core::{CacheState, EncryptedPhrase, PhraseCache, SiteKeyError};

const IDENTITY: &str = "JaneCitizen";

#[test]
fn persisted_cache_survives_restart() {
    let mut cache = PhraseCache::new();
    cache
        .encrypt("My pass phrase", IDENTITY)
        .expect("encrypt should succeed");
    let (hash, encrypted) = cache.stored_values().expect("values should be stored");
    let hash = hash.to_owned();
    let wire = encrypted.to_bytes();
    let json = serde_json::to_string(encrypted).expect("serialize should succeed");
    drop(cache);

    let mut from_wire = PhraseCache::new();
    from_wire
        .store_values(&hash, EncryptedPhrase::from_bytes(&wire).unwrap())
        .unwrap();
    assert_eq!(
        from_wire.decrypt("My ", IDENTITY).unwrap().as_str(),
        "My pass phrase"
    );

    let mut from_json = PhraseCache::new();
    from_json
        .store_values(&hash, serde_json::from_str(&json).unwrap())
        .unwrap();
    assert_eq!(
        from_json.decrypt("My ", "janecitizen").unwrap().as_str(),
        "My pass phrase"
    );
}

#[test]
fn single_guess_then_cleared() {
    let mut cache = PhraseCache::new();
    cache.encrypt("hunter2 and more", IDENTITY).unwrap();
    assert_eq!(
        cache.decrypt("hun", "JaneCitizen2").unwrap_err(),
        SiteKeyError::PrefixMismatch
    );
    assert_eq!(cache.state(), CacheState::Failed);
    assert_eq!(
        cache.decrypt("hun", IDENTITY).unwrap_err(),
        SiteKeyError::NoDataStored
    );
    cache.clear_store();
    assert_eq!(cache.state(), CacheState::Editing);
}

#[test]
fn multibyte_phrase_roundtrip() {
    let mut cache = PhraseCache::new();
    cache.encrypt("ñandú pass", IDENTITY).unwrap();
    assert_eq!(cache.decrypt("ñan", IDENTITY).unwrap().as_str(), "ñandú pass");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any phrase of three or more characters comes back from its prefix.
    #[test]
    fn roundtrip_any_phrase(phrase in "\\PC{3,40}", identity in "[a-z]{1,12}") {
        let mut cache = PhraseCache::new();
        cache.encrypt(&phrase, &identity).unwrap();
        let prefix: String = phrase.chars().take(3).collect();
        let recovered = cache.decrypt(&prefix, &identity).unwrap();
        prop_assert_eq!(recovered.as_str(), phrase.as_str());
        prop_assert_eq!(cache.state(), CacheState::Stored);
    }

    /// Phrases under three characters are refused.
    #[test]
    fn short_phrase_refused(phrase in "\\PC{0,2}") {
        let mut cache = PhraseCache::new();
        prop_assert_eq!(cache.encrypt(&phrase, IDENTITY), Err(SiteKeyError::PhraseTooShort));
    }
}
