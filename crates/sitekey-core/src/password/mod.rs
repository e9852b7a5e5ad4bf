//! Seed-to-character mapping.
//!
//! Two mapping schemes exist and every output type uses exactly one:
//! - [`OutputScheme::ClassProfile`]: one general character set, required
//!   character classes forced into seed-chosen slots, optional fixed spaces
//! - [`OutputScheme::TemplateSet`]: pronounceable templates whose symbols
//!   each pick from a small character set (see [`template`])
//!
//! The two schemes use different modulus conventions (`len - 1` for class
//! profiles, `len` for templates). Both are kept bit-for-bit because existing
//! outputs depend on them.

pub mod profiles;
pub mod template;

use zeroize::{Zeroize, Zeroizing};

use crate::error::SiteKeyError;
use crate::kdf::SEED_LEN;
use crate::memory::SecretBytes;

pub use profiles::{Namespace, OutputType};

// ---------------------------------------------------------------------------
// Character sets
// ---------------------------------------------------------------------------

pub(crate) const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub(crate) const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub(crate) const DIGITS: &str = "0123456789";
pub(crate) const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:',.<>?/~";

/// Uppercase, lowercase, digits and symbols, in that order.
pub(crate) const FULL_SET: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "0123456789",
    "!@#$%^&*()-_=+[]{}|;:',.<>?/~"
);

/// Uppercase, lowercase and digits.
pub(crate) const ALPHANUMERIC_SET: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "0123456789"
);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A character category an output must contain at least once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl CharClass {
    /// The characters drawn from when this class is forced.
    #[must_use]
    pub const fn charset(self) -> &'static str {
        match self {
            Self::Uppercase => UPPERCASE,
            Self::Lowercase => LOWERCASE,
            Self::Digit => DIGITS,
            Self::Symbol => SYMBOLS,
        }
    }

    /// Returns `true` if `c` belongs to this class.
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        self.charset().contains(c)
    }
}

/// Length, character set and composition rules for a class-profile output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputTypeProfile {
    /// General character set.
    pub charset: &'static str,
    /// Exact output length.
    pub length: usize,
    /// Required classes, in placement order.
    pub required: &'static [CharClass],
    /// Positions that are always a space.
    pub spaces: &'static [usize],
}

/// How a seed array is turned into output for one output type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputScheme {
    ClassProfile(&'static OutputTypeProfile),
    TemplateSet(&'static [&'static str]),
}

impl OutputScheme {
    /// Longest output this scheme can produce.
    #[must_use]
    pub fn max_length(self) -> usize {
        match self {
            Self::ClassProfile(profile) => profile.length,
            Self::TemplateSet(templates) => templates.iter().map(|t| t.len()).max().unwrap_or(0),
        }
    }

    /// Short scheme name for listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ClassProfile(_) => "class-profile",
            Self::TemplateSet(_) => "template",
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Build the output string for `scheme` from `seed`, then zero the seed.
///
/// The seed is zeroed on the error path as well.
///
/// # Errors
///
/// Returns [`SiteKeyError::CryptoOperationFailed`] if the scheme needs more
/// seed bytes than are available, or a template uses an unknown symbol.
pub fn map_seed(
    seed: &mut SecretBytes<SEED_LEN>,
    scheme: OutputScheme,
) -> Result<Zeroizing<String>, SiteKeyError> {
    let result = match scheme {
        OutputScheme::ClassProfile(profile) => map_class_profile(seed.expose(), profile),
        OutputScheme::TemplateSet(templates) => template::map_template(seed.expose(), templates),
    };
    seed.zeroize();
    result
}

/// Class-profile mapping.
///
/// Slot assignment: with `adj = length - 1`, the k-th required class is
/// assigned slot `(seed[0] + k) mod adj`. Scanning left to right, a slot whose
/// class is still unsatisfied is drawn from that class; every other slot is
/// drawn from the general set. Any emitted character satisfies every class it
/// belongs to.
fn map_class_profile(
    seed: &[u8; SEED_LEN],
    profile: &OutputTypeProfile,
) -> Result<Zeroizing<String>, SiteKeyError> {
    if profile.length > SEED_LEN {
        return Err(seed_too_short(profile.length));
    }

    let adjusted_len = profile.length.saturating_sub(1);
    let first_slot = usize::from(seed[0]).checked_rem(adjusted_len).unwrap_or(0);
    let slots: Vec<usize> = (0..profile.required.len())
        .map(|k| {
            first_slot
                .saturating_add(k)
                .checked_rem(adjusted_len)
                .unwrap_or(0)
        })
        .collect();
    let mut satisfied = vec![false; profile.required.len()];

    let mut out = Zeroizing::new(String::with_capacity(profile.length));
    for (i, &byte) in seed.iter().enumerate().take(profile.length) {
        if profile.spaces.contains(&i) {
            out.push(' ');
            continue;
        }

        let forced = profile
            .required
            .iter()
            .zip(&slots)
            .zip(&satisfied)
            .find(|&((_, &slot), &done)| !done && slot == i)
            .map(|((class, _), _)| *class);
        let charset = forced.map_or(profile.charset, CharClass::charset);

        let c = pick_excluding_last(charset, byte);
        out.push(c);

        for (class, done) in profile.required.iter().zip(satisfied.iter_mut()) {
            if !*done && class.contains(c) {
                *done = true;
            }
        }
    }

    Ok(out)
}

/// `charset[byte mod (len - 1)]`.
///
/// The final character of `charset` is never selected. Existing outputs
/// depend on this, so it stays.
fn pick_excluding_last(charset: &str, byte: u8) -> char {
    let bytes = charset.as_bytes();
    let index = usize::from(byte)
        .checked_rem(bytes.len().saturating_sub(1))
        .unwrap_or(0);
    bytes.get(index).copied().map_or(' ', char::from)
}

fn seed_too_short(needed: usize) -> SiteKeyError {
    SiteKeyError::CryptoOperationFailed(format!(
        "output needs {needed} seed bytes, only {SEED_LEN} available"
    ))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
