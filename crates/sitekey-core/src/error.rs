//! Error types for `sitekey-core`.

use thiserror::Error;

/// Errors produced by generation and by the temporary phrase cache.
///
/// Every variant is local and recoverable. The core never logs or swallows
/// these; the host decides what to show and whether to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SiteKeyError {
    /// Identity (full name or username) is empty after trimming.
    #[error("identity is required")]
    MissingIdentity,

    /// Pass phrase is empty.
    #[error("pass phrase is required")]
    MissingPassphrase,

    /// Domain is empty, a bare `www`, or has no labels left after canonicalization.
    #[error("domain is required")]
    MissingDomain,

    /// Output type `answer` was requested without a security question.
    #[error("security question is required for answer output")]
    MissingSecurityQuestion,

    /// Output type name is not in the profile table.
    #[error("unrecognized output type: {0}")]
    UnrecognizedOutputType(String),

    /// A primitive (PBKDF2, HMAC, AES-CBC, hex) rejected its input.
    #[error("cryptographic operation failed: {0}")]
    CryptoOperationFailed(String),

    /// `encrypt` was called with fewer than three characters.
    #[error("pass phrase must be at least 3 characters to cache")]
    PhraseTooShort,

    /// `decrypt` was called on an empty cache.
    #[error("no pass phrase is stored")]
    NoDataStored,

    /// Unlock prefix is not exactly three characters.
    #[error("unlock prefix must be exactly 3 characters")]
    InvalidPrefixFormat,

    /// Unlock prefix did not verify. The cache has been cleared.
    #[error("unlock prefix does not match; stored pass phrase cleared")]
    PrefixMismatch,
}
