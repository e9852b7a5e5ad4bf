//! Template-based mapping for pronounceable outputs.
//!
//! A template is a string of symbols; each symbol names a character set:
//!
//! | symbol | characters |
//! |---|---|
//! | `V` | uppercase vowels |
//! | `C` | uppercase consonants |
//! | `v` | lowercase vowels |
//! | `c` | lowercase consonants |
//! | `A` | uppercase letters |
//! | `a` | letters |
//! | `n` | digits |
//! | `o` | symbols |
//! | `x` | letters, digits and symbols |
//! | ` ` | space |
//!
//! `seed[0]` chooses the template, `seed[i + 1]` chooses the character at
//! position `i`, both with a plain `mod len`.

use zeroize::Zeroizing;

use crate::error::SiteKeyError;
use crate::kdf::SEED_LEN;

const UPPER_VOWELS: &str = "AEIOU";
const UPPER_CONSONANTS: &str = "BCDFGHJKLMNPQRSTVWXYZ";
const LOWER_VOWELS: &str = "aeiou";
const LOWER_CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";
const UPPER_LETTERS: &str = "AEIOUBCDFGHJKLMNPQRSTVWXYZ";
const LETTERS: &str = "AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz";
const NUMBERS: &str = "0123456789";
const OTHER: &str = "@&%?,=[]_:-+*$#!'^~;()/.";
const ANY: &str = "AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz0123456789!@#$%^&*()";
const SPACE: &str = " ";

/// Character set for a template symbol, or `None` if the symbol is unknown.
#[must_use]
pub const fn symbol_charset(symbol: char) -> Option<&'static str> {
    match symbol {
        'V' => Some(UPPER_VOWELS),
        'C' => Some(UPPER_CONSONANTS),
        'v' => Some(LOWER_VOWELS),
        'c' => Some(LOWER_CONSONANTS),
        'A' => Some(UPPER_LETTERS),
        'a' => Some(LETTERS),
        'n' => Some(NUMBERS),
        'o' => Some(OTHER),
        'x' => Some(ANY),
        ' ' => Some(SPACE),
        _ => None,
    }
}

/// Map `seed` through one of `templates`.
pub(super) fn map_template(
    seed: &[u8; SEED_LEN],
    templates: &[&str],
) -> Result<Zeroizing<String>, SiteKeyError> {
    let template = usize::from(seed[0])
        .checked_rem(templates.len())
        .and_then(|index| templates.get(index))
        .ok_or_else(|| SiteKeyError::CryptoOperationFailed("empty template set".into()))?;

    let mut out = Zeroizing::new(String::with_capacity(template.len()));
    for (i, symbol) in template.chars().enumerate() {
        let charset = symbol_charset(symbol).ok_or_else(|| {
            SiteKeyError::CryptoOperationFailed(format!("unknown template symbol {symbol:?}"))
        })?;
        let byte = i
            .checked_add(1)
            .and_then(|next| seed.get(next))
            .ok_or_else(|| {
                SiteKeyError::CryptoOperationFailed(format!(
                    "template of length {} exceeds seed",
                    template.len()
                ))
            })?;
        let chars = charset.as_bytes();
        let index = usize::from(*byte).checked_rem(chars.len()).unwrap_or(0);
        out.push(chars.get(index).copied().map_or(' ', char::from));
    }
    Ok(out)
}
