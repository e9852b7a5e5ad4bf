//! Password generation entry point.
//!
//! [`generate`] validates and canonicalizes a [`GenerationRequest`], derives
//! the site seed and maps it to the requested output type. The same request
//! always yields the same output; nothing is stored between calls.

use std::fmt;

use zeroize::Zeroizing;

use crate::canonical::{canonicalize_domain, canonicalize_identity, canonicalize_security_question};
use crate::error::SiteKeyError;
use crate::password::{self, OutputType};
use crate::seed::{self, SeedInput};

/// Version used when the caller does not set one.
pub const DEFAULT_VERSION: u32 = 1;

/// Raw field values for one generation.
///
/// Borrowed for the duration of the call. The pass phrase belongs to the
/// caller, which is responsible for zeroizing it.
#[derive(Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub identity: &'a str,
    pub passphrase: &'a [u8],
    pub domain: &'a str,
    pub output_type: &'a str,
    pub site_username: Option<&'a str>,
    pub security_question: Option<&'a str>,
    pub version: u32,
}

impl<'a> GenerationRequest<'a> {
    #[must_use]
    pub const fn new(
        identity: &'a str,
        passphrase: &'a [u8],
        domain: &'a str,
        output_type: &'a str,
    ) -> Self {
        Self {
            identity,
            passphrase,
            domain,
            output_type,
            site_username: None,
            security_question: None,
            version: DEFAULT_VERSION,
        }
    }

    #[must_use]
    pub const fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub const fn with_site_username(mut self, username: &'a str) -> Self {
        self.site_username = Some(username);
        self
    }

    #[must_use]
    pub const fn with_security_question(mut self, question: &'a str) -> Self {
        self.security_question = Some(question);
        self
    }
}

impl fmt::Debug for GenerationRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
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

/// Derive the output for `request`.
///
/// Checks run in a fixed order so a form with several empty fields always
/// reports the same one first: identity, pass phrase, domain, security
/// question (only for `answer`), then the output type name.
///
/// # Errors
///
/// - [`SiteKeyError::MissingIdentity`] if the identity is blank
/// - [`SiteKeyError::MissingPassphrase`] if the pass phrase is empty
/// - [`SiteKeyError::MissingDomain`] if nothing is left of the domain after
///   canonicalization
/// - [`SiteKeyError::MissingSecurityQuestion`] for `answer` without a question
/// - [`SiteKeyError::UnrecognizedOutputType`] for an unknown type name
/// - [`SiteKeyError::CryptoOperationFailed`] if a primitive fails
pub fn generate(request: &GenerationRequest<'_>) -> Result<Zeroizing<String>, SiteKeyError> {
    let identity = canonicalize_identity(request.identity);
    if identity.is_empty() {
        return Err(SiteKeyError::MissingIdentity);
    }

    if request.passphrase.is_empty() {
        return Err(SiteKeyError::MissingPassphrase);
    }

    let domain = canonicalize_domain(request.domain);
    if domain.is_empty() {
        return Err(SiteKeyError::MissingDomain);
    }

    let question = request
        .security_question
        .map(canonicalize_security_question)
        .filter(|q| !q.is_empty());
    if request.output_type == OutputType::Answer.as_str() && question.is_none() {
        return Err(SiteKeyError::MissingSecurityQuestion);
    }

    let output_type: OutputType = request.output_type.parse()?;

    let username = request
        .site_username
        .map(canonicalize_identity)
        .filter(|u| !u.is_empty());

    let input = SeedInput {
        identity: &identity,
        passphrase: request.passphrase,
        domain: &domain,
        output_type,
        site_username: username.as_deref(),
        security_question: question.as_deref(),
        version: request.version,
    };

    let mut seed = seed::derive_seed(&input)?;
    let output = password::map_seed(&mut seed, output_type.scheme())?;

    tracing::debug!(
        output_type = %output_type,
        version = request.version,
        "site output generated"
    );

    Ok(output)
}
