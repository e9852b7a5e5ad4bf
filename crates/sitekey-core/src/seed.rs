//! Site seed derivation: namespaced salt, subject string, PBKDF2 then HMAC.
//!
//! ```text
//! salt    = namespace "." identity
//! subject = [username version "@"] domain [":" question]
//! key     = PBKDF2-HMAC-SHA1(passphrase, salt, 750, 128 bits)
//! seed    = HMAC-SHA256(key, subject)
//! ```
//!
//! All text inputs are expected to be canonical already.

use zeroize::Zeroize;

use crate::error::SiteKeyError;
use crate::kdf::{self, Pbkdf2Params, SEED_LEN};
use crate::memory::SecretBytes;
use crate::password::{Namespace, OutputType};

/// Canonical inputs to one seed derivation.
#[derive(Clone, Copy)]
pub struct SeedInput<'a> {
    pub identity: &'a str,
    pub passphrase: &'a [u8],
    pub domain: &'a str,
    pub output_type: OutputType,
    pub site_username: Option<&'a str>,
    pub security_question: Option<&'a str>,
    pub version: u32,
}

impl std::fmt::Debug for SeedInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedInput")
            .field("identity", &self.identity)
            .field("passphrase", &"***")
            .field("domain", &self.domain)
            .field("output_type", &self.output_type)
            .field("site_username", &self.site_username)
            .field("security_question", &self.security_question)
            .field("version", &self.version)
            .finish()
    }
}

/// `namespace + "." + identity`.
#[must_use]
pub fn build_salt(namespace: Namespace, identity: &str) -> String {
    format!("{}.{identity}", namespace.as_str())
}

/// The HMAC message for a site.
///
/// The version only enters through the username prefix; without a site
/// username the subject is the bare domain for every version.
#[must_use]
pub fn build_subject(input: &SeedInput<'_>) -> String {
    let mut subject = match input.site_username {
        Some(username) => format!("{username}{}@{}", input.version, input.domain),
        None => input.domain.to_owned(),
    };
    if input.output_type.requires_question() {
        if let Some(question) = input.security_question {
            subject.push(':');
            subject.push_str(question);
        }
    }
    subject
}

/// Derive the 32-byte seed for `input`.
///
/// The intermediate PBKDF2 key is zeroized before returning.
///
/// # Errors
///
/// Returns [`SiteKeyError::CryptoOperationFailed`] if PBKDF2 rejects its
/// parameters.
pub fn derive_seed(input: &SeedInput<'_>) -> Result<SecretBytes<SEED_LEN>, SiteKeyError> {
    let salt = build_salt(input.output_type.namespace(), input.identity);
    let subject = build_subject(input);

    let mut key = kdf::pbkdf2(input.passphrase, salt.as_bytes(), Pbkdf2Params::GENERATOR)?;
    let seed = kdf::hmac_sha256(subject.as_bytes(), key.expose());
    key.zeroize();

    Ok(seed)
}
