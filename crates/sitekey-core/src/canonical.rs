//! Canonical forms for domain, identity and security question input.
//!
//! Superficial differences a user cannot be expected to reproduce exactly
//! (case, URL decoration, subdomains, punctuation) must not change the
//! derived output, so every text input goes through here first.

/// Two-letter country-code top-level domains kept as a suffix.
///
/// `io` is deliberately absent: it is used as a generic TLD and treating it
/// as a country suffix would keep unrelated subdomains apart.
const COUNTRY_CODE_TLDS: &[&str] = &[
    "ac", "ad", "ae", "af", "ag", "ai", "al", "am", "ao", "aq", "ar", "as", "at", "au", "aw", "ax",
    "az", "ba", "bb", "bd", "be", "bf", "bg", "bh", "bi", "bj", "bm", "bn", "bo", "bq", "br", "bs",
    "bt", "bw", "by", "bz", "ca", "cc", "cd", "cf", "cg", "ch", "ci", "ck", "cl", "cm", "cn", "co",
    "cr", "cu", "cv", "cw", "cx", "cy", "cz", "de", "dj", "dk", "dm", "do", "dz", "ec", "ee", "eg",
    "er", "es", "et", "eu", "fi", "fj", "fk", "fm", "fo", "fr", "ga", "gb", "gd", "ge", "gf", "gg",
    "gh", "gi", "gl", "gm", "gn", "gp", "gq", "gr", "gs", "gt", "gu", "gw", "gy", "hk", "hm", "hn",
    "hr", "ht", "hu", "id", "ie", "il", "im", "in", "iq", "ir", "is", "it", "je", "jm", "jo", "jp",
    "ke", "kg", "kh", "ki", "km", "kn", "kp", "kr", "kw", "ky", "kz", "la", "lb", "lc", "li", "lk",
    "lr", "ls", "lt", "lu", "lv", "ly", "ma", "mc", "md", "me", "mg", "mh", "mk", "ml", "mm", "mn",
    "mo", "mp", "mq", "mr", "ms", "mt", "mu", "mv", "mw", "mx", "my", "mz", "na", "nc", "ne", "nf",
    "ng", "ni", "nl", "no", "np", "nr", "nu", "nz", "om", "pa", "pe", "pf", "pg", "ph", "pk", "pl",
    "pm", "pn", "pr", "ps", "pt", "pw", "py", "qa", "re", "ro", "rs", "ru", "rw", "sa", "sb", "sc",
    "sd", "se", "sg", "sh", "si", "sk", "sl", "sm", "sn", "so", "sr", "ss", "st", "su", "sv", "sx",
    "sy", "sz", "tc", "td", "tf", "tg", "th", "tj", "tk", "tl", "tm", "tn", "to", "tr", "tt", "tv",
    "tw", "tz", "ua", "ug", "uk", "us", "uy", "uz", "va", "vc", "ve", "vg", "vi", "vn", "vu", "wf",
    "ws", "ye", "yt", "za", "zm", "zw",
];

/// Host values that mean the user has not finished typing a domain.
const INCOMPLETE_HOSTS: &[&str] = &["www", "ww", "w"];

/// Characters dropped from security questions.
const QUESTION_PUNCTUATION: &[char] = &[
    '.', ',', '-', '/', '#', '!', '%', '^', '&', '*', ';', ':', '{', '}', '=', '_', '`', '~', '(',
    ')', '?', '\'', '"',
];

/// Returns `true` if `label` is a country-code TLD kept as a suffix.
#[must_use]
pub fn is_country_code_tld(label: &str) -> bool {
    COUNTRY_CODE_TLDS.binary_search(&label).is_ok()
}

/// Reduce a domain or URL to its registrable part.
///
/// `https://Mail.Example.co.uk/inbox` becomes `example.co.uk` and
/// `photos.google.com` becomes `google.com`. Returns an empty string for a
/// bare `www`/`ww`/`w` host or when no labels remain; callers treat that as a
/// missing domain.
#[must_use]
pub fn canonicalize_domain(raw: &str) -> String {
    let host = strip_scheme(raw.trim());
    let host = host
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default().to_lowercase();

    let mut labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if let [only] = labels.as_slice() {
        if INCOMPLETE_HOSTS.contains(only) {
            return String::new();
        }
    }

    let suffix = match labels.last() {
        Some(&last) if is_country_code_tld(last) => {
            labels.pop();
            Some(last)
        }
        _ => None,
    };

    let kept = labels.get(labels.len().saturating_sub(2)..).unwrap_or_default();
    if kept.is_empty() {
        return String::new();
    }

    let mut canonical = kept.join(".");
    if let Some(country) = suffix {
        canonical.push('.');
        canonical.push_str(country);
    }
    canonical
}

/// Trim and lower-case an identity or site username.
#[must_use]
pub fn canonicalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Strip punctuation, collapse whitespace runs and lower-case a question.
#[must_use]
pub fn canonicalize_security_question(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !QUESTION_PUNCTUATION.contains(c))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_scheme(raw: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if let Some(prefix) = raw.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                return raw.get(scheme.len()..).unwrap_or_default();
            }
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tld_table_is_sorted_for_binary_search() {
        assert!(COUNTRY_CODE_TLDS.windows(2).all(|w| w[0] < w[1]));
        assert!(COUNTRY_CODE_TLDS.iter().all(|t| t.len() == 2));
    }

    #[test]
    fn io_is_not_a_country_code() {
        assert!(!is_country_code_tld("io"));
        assert_eq!(canonicalize_domain("app.github.io"), "github.io");
    }

    #[test]
    fn plain_domain_is_unchanged() {
        assert_eq!(canonicalize_domain("test.com"), "test.com");
    }

    #[test]
    fn subdomains_collapse_to_last_two_labels() {
        assert_eq!(canonicalize_domain("photos.google.com"), "google.com");
        assert_eq!(canonicalize_domain("a.b.c.example.org"), "example.org");
    }

    #[test]
    fn country_suffix_is_kept() {
        assert_eq!(canonicalize_domain("mail.example.co.uk"), "example.co.uk");
        assert_eq!(canonicalize_domain("example.com.au"), "example.com.au");
        assert_eq!(canonicalize_domain("mail.example.com.au"), "example.com.au");
        assert_eq!(canonicalize_domain("example.de"), "example.de");
    }

    #[test]
    fn scheme_path_and_case_are_stripped() {
        assert_eq!(canonicalize_domain("HTTPS://Test.COM/login"), "test.com");
        assert_eq!(canonicalize_domain("http://www.test.com/"), "test.com");
        assert_eq!(canonicalize_domain("https://test.com?next=/a"), "test.com");
        assert_eq!(canonicalize_domain("test.com:8443/x"), "test.com");
    }

    #[test]
    fn www_alone_is_empty() {
        assert_eq!(canonicalize_domain("www"), "");
        assert_eq!(canonicalize_domain("ww"), "");
        assert_eq!(canonicalize_domain("https://w"), "");
        assert_eq!(canonicalize_domain("WWW"), "");
        assert_eq!(canonicalize_domain("www."), "");
        assert_eq!(canonicalize_domain("https://www./"), "");
        assert_eq!(canonicalize_domain(".ww."), "");
    }

    #[test]
    fn no_labels_is_empty() {
        assert_eq!(canonicalize_domain(""), "");
        assert_eq!(canonicalize_domain("..."), "");
        assert_eq!(canonicalize_domain("https://"), "");
    }

    #[test]
    fn bare_country_code_leaves_no_labels() {
        assert_eq!(canonicalize_domain("au"), "");
        assert_eq!(canonicalize_domain("https://.uk/"), "");
    }

    #[test]
    fn domain_canonicalization_is_idempotent() {
        for raw in [
            "https://mail.example.co.uk/x",
            "photos.google.com",
            "www.test.com",
            "example.com.au",
            "localhost",
            "www.",
            "w.",
        ] {
            let once = canonicalize_domain(raw);
            assert_eq!(canonicalize_domain(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn identity_is_trimmed_and_lowered() {
        assert_eq!(canonicalize_identity("  JaneCitizen \t"), "janecitizen");
        assert_eq!(canonicalize_identity("Jane Citizen"), "jane citizen");
    }

    #[test]
    fn question_punctuation_and_spacing_removed() {
        assert_eq!(
            canonicalize_security_question("  What is your   Mother's maiden-name?? "),
            "what is your mothers maidenname"
        );
        assert_eq!(
            canonicalize_security_question("(First) pet: \"name\"; {age} = 3!"),
            "first pet name age 3"
        );
    }

    #[test]
    fn question_of_only_punctuation_is_empty() {
        assert_eq!(canonicalize_security_question("?!..."), "");
    }
}
