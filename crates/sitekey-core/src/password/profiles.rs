//! Output types and their static mapping table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    CharClass, OutputScheme, OutputTypeProfile, ALPHANUMERIC_SET, DIGITS, FULL_SET, LOWERCASE,
};
use crate::error::SiteKeyError;

const ALL_CLASSES: &[CharClass] = &[
    CharClass::Uppercase,
    CharClass::Lowercase,
    CharClass::Digit,
    CharClass::Symbol,
];

const ALPHANUMERIC_CLASSES: &[CharClass] =
    &[CharClass::Uppercase, CharClass::Lowercase, CharClass::Digit];

static MAXIMUM: OutputTypeProfile = OutputTypeProfile {
    charset: FULL_SET,
    length: 20,
    required: ALL_CLASSES,
    spaces: &[],
};

static LONG: OutputTypeProfile = OutputTypeProfile {
    charset: FULL_SET,
    length: 14,
    required: ALL_CLASSES,
    spaces: &[],
};

static MEDIUM: OutputTypeProfile = OutputTypeProfile {
    charset: FULL_SET,
    length: 10,
    required: ALL_CLASSES,
    spaces: &[],
};

static BASIC: OutputTypeProfile = OutputTypeProfile {
    charset: ALPHANUMERIC_SET,
    length: 8,
    required: ALPHANUMERIC_CLASSES,
    spaces: &[],
};

static SHORT: OutputTypeProfile = OutputTypeProfile {
    charset: ALPHANUMERIC_SET,
    length: 6,
    required: ALPHANUMERIC_CLASSES,
    spaces: &[],
};

static PIN: OutputTypeProfile = OutputTypeProfile {
    charset: DIGITS,
    length: 4,
    required: &[],
    spaces: &[],
};

static PIN_6: OutputTypeProfile = OutputTypeProfile {
    charset: DIGITS,
    length: 6,
    required: &[],
    spaces: &[],
};

// Word breaks give "xxxx xxx xxxxxxx xxx".
static ANSWER: OutputTypeProfile = OutputTypeProfile {
    charset: LOWERCASE,
    length: 20,
    required: &[],
    spaces: &[4, 8, 16],
};

static LOGIN_TEMPLATES: &[&str] = &["cvccvcvcv", "cvcvccvcv", "cvcvcvccv"];

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// Salt namespace family. Keeps a login and a password for the same site
/// and pass phrase unrelated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    Password,
    Login,
    Answer,
}

impl Namespace {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "sitekey.password",
            Self::Login => "sitekey.login",
            Self::Answer => "sitekey.answer",
        }
    }
}

// ---------------------------------------------------------------------------
// OutputType
// ---------------------------------------------------------------------------

/// What kind of string to derive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    MaximumPassword,
    LongPassword,
    MediumPassword,
    BasicPassword,
    ShortPassword,
    Pin,
    #[serde(rename = "pin-6")]
    Pin6,
    Login,
    Answer,
}

impl OutputType {
    /// Every output type, in display order.
    pub const ALL: [Self; 9] = [
        Self::MaximumPassword,
        Self::LongPassword,
        Self::MediumPassword,
        Self::BasicPassword,
        Self::ShortPassword,
        Self::Pin,
        Self::Pin6,
        Self::Login,
        Self::Answer,
    ];

    /// Wire name, e.g. `maximum-password`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaximumPassword => "maximum-password",
            Self::LongPassword => "long-password",
            Self::MediumPassword => "medium-password",
            Self::BasicPassword => "basic-password",
            Self::ShortPassword => "short-password",
            Self::Pin => "pin",
            Self::Pin6 => "pin-6",
            Self::Login => "login",
            Self::Answer => "answer",
        }
    }

    #[must_use]
    pub const fn namespace(self) -> Namespace {
        match self {
            Self::Login => Namespace::Login,
            Self::Answer => Namespace::Answer,
            _ => Namespace::Password,
        }
    }

    #[must_use]
    pub fn scheme(self) -> OutputScheme {
        match self {
            Self::MaximumPassword => OutputScheme::ClassProfile(&MAXIMUM),
            Self::LongPassword => OutputScheme::ClassProfile(&LONG),
            Self::MediumPassword => OutputScheme::ClassProfile(&MEDIUM),
            Self::BasicPassword => OutputScheme::ClassProfile(&BASIC),
            Self::ShortPassword => OutputScheme::ClassProfile(&SHORT),
            Self::Pin => OutputScheme::ClassProfile(&PIN),
            Self::Pin6 => OutputScheme::ClassProfile(&PIN_6),
            Self::Login => OutputScheme::TemplateSet(LOGIN_TEMPLATES),
            Self::Answer => OutputScheme::ClassProfile(&ANSWER),
        }
    }

    /// Returns `true` for types that need a security question.
    #[must_use]
    pub const fn requires_question(self) -> bool {
        matches!(self, Self::Answer)
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = SiteKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SiteKeyError::UnrecognizedOutputType(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::SEED_LEN;
    use crate::password::template::symbol_charset;

    #[test]
    fn names_roundtrip_through_from_str() {
        for t in OutputType::ALL {
            assert_eq!(t.as_str().parse::<OutputType>().unwrap(), t);
            assert_eq!(t.to_string(), t.as_str());
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "mega-password".parse::<OutputType>().unwrap_err();
        assert_eq!(
            err,
            SiteKeyError::UnrecognizedOutputType("mega-password".into())
        );
        assert!("Pin".parse::<OutputType>().is_err());
    }

    #[test]
    fn serde_names_match_wire_names() {
        for t in OutputType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            let back: OutputType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, t);
        }
    }

    #[test]
    fn namespaces_are_distinct_per_family() {
        assert_eq!(OutputType::Pin.namespace(), Namespace::Password);
        assert_eq!(OutputType::Login.namespace(), Namespace::Login);
        assert_eq!(OutputType::Answer.namespace(), Namespace::Answer);
        assert_ne!(Namespace::Password.as_str(), Namespace::Login.as_str());
        assert_ne!(Namespace::Login.as_str(), Namespace::Answer.as_str());
    }

    #[test]
    fn every_profile_fits_in_the_seed() {
        for t in OutputType::ALL {
            match t.scheme() {
                OutputScheme::ClassProfile(p) => {
                    assert!(p.length <= SEED_LEN, "{t} too long");
                    assert!(p.charset.len() > 1, "{t} charset too small");
                    assert!(p.spaces.iter().all(|&s| s < p.length));
                    assert!(p.required.len() < p.length);
                }
                OutputScheme::TemplateSet(templates) => {
                    assert!(!templates.is_empty());
                    for template in templates {
                        assert!(template.len() < SEED_LEN, "{t} template too long");
                        assert!(template.chars().all(|c| symbol_charset(c).is_some()));
                    }
                }
            }
        }
    }

    #[test]
    fn declared_lengths() {
        let lengths: Vec<usize> = OutputType::ALL
            .iter()
            .map(|t| t.scheme().max_length())
            .collect();
        assert_eq!(lengths, vec![20, 14, 10, 8, 6, 4, 6, 9, 20]);
    }

    #[test]
    fn only_answer_requires_question() {
        for t in OutputType::ALL {
            assert_eq!(t.requires_question(), t == OutputType::Answer);
        }
    }
}
