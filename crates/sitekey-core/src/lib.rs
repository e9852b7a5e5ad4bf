//! `sitekey-core`: deterministic site passwords and a temporary pass phrase cache.
//!
//! No storage, no network, no async. The same identity, pass phrase, domain
//! and output type always produce the same output; the only state is the
//! optional in-memory [`PhraseCache`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod encoding;
pub mod kdf;
pub mod symmetric;

pub mod canonical;

pub mod password;

pub mod seed;

pub mod generator;

pub mod cache;

pub use cache::{verification_hash, CacheState, CachedPhrase, PhraseCache};
pub use canonical::{
    canonicalize_domain, canonicalize_identity, canonicalize_security_question,
    is_country_code_tld,
};
pub use error::SiteKeyError;
pub use generator::{generate, GenerationRequest, DEFAULT_VERSION};
pub use memory::{disable_core_dumps, SecretBuffer, SecretBytes};
pub use password::{CharClass, Namespace, OutputScheme, OutputType, OutputTypeProfile};
pub use symmetric::EncryptedPhrase;
