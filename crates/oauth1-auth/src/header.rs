//! Parsing of `Authorization: OAuth ...` header values.
//!
//! The header has the format:
//!
//! ```text
//! OAuth oauth_consumer_key="ck", oauth_nonce="abc123", oauth_signature="...", ...
//! ```
//!
//! Parameters are separated by `", "`. The `oauth_` prefix is stripped from
//! each key, so `oauth_signature` is stored as `signature` while `realm`
//! stays `realm`.

use crate::error::AuthError;

/// Literal prefix every OAuth `Authorization` value starts with.
pub const OAUTH_PREFIX: &str = "OAuth ";

/// Parameter names that must be present in every header (prefix stripped).
pub const REQUIRED_PARAMS: [&str; 6] = [
    "consumer_key",
    "nonce",
    "signature",
    "signature_method",
    "timestamp",
    "version",
];

/// Parameters parsed from an `Authorization` header, in header order.
///
/// A repeated key overwrites the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationParams {
    entries: Vec<(String, String)>,
}

impl AuthorizationParams {
    /// Insert a parameter, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a parameter by its prefix-stripped name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the parameter is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The first required parameter that is absent, if any.
    #[must_use]
    pub fn first_missing_required(&self) -> Option<&'static str> {
        REQUIRED_PARAMS
            .into_iter()
            .find(|name| !self.contains(name))
    }

    /// Iterate over the parameters in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameter was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split an `Authorization` header value into its parameters.
///
/// Tokens without an `=` are skipped. Only the first `=` separates key from
/// value, and one pair of surrounding double quotes is removed from the value.
///
/// # Errors
///
/// Returns [`AuthError::MalformedHeader`] if the value does not start with `OAuth `.
///
/// # Examples
///
/// ```
/// use oauth1_auth::header::split_authorization_params;
///
/// let params = split_authorization_params(
///     r#"OAuth oauth_consumer_key="ck", oauth_signature="a%3D", realm="api""#,
/// )
/// .unwrap();
/// assert_eq!(params.get("consumer_key"), Some("ck"));
/// assert_eq!(params.get("signature"), Some("a%3D"));
/// assert_eq!(params.get("realm"), Some("api"));
/// ```
pub fn split_authorization_params(header: &str) -> Result<AuthorizationParams, AuthError> {
    let rest = header
        .strip_prefix(OAUTH_PREFIX)
        .ok_or(AuthError::MalformedHeader)?;

    let mut params = AuthorizationParams::default();
    for token in rest.split(", ") {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let key = key.strip_prefix("oauth_").unwrap_or(key);
        params.insert(key, strip_quotes(value));
    }

    Ok(params)
}

/// Remove one pair of double quotes if the value is wrapped in them.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
