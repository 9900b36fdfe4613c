//! Percent-encoding per RFC 3986 as required by OAuth 1.0a.
//!
//! Only the unreserved characters `A-Z a-z 0-9 - . _ ~` pass through. Every
//! other byte of the UTF-8 input becomes `%XX` with uppercase hex, including
//! `! * ' ( )` which many URL encoders leave alone. Space is `%20`, never `+`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string for use in an OAuth base string or header.
///
/// # Examples
///
/// ```
/// use oauth1_auth::encoding::percent_encode;
///
/// assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
/// assert_eq!(percent_encode("it's (nice)!*"), "it%27s%20%28nice%29%21%2A");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Percent-encode each element of a sequence independently.
#[must_use]
pub fn percent_encode_all<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| percent_encode(v.as_ref()))
        .collect()
}
