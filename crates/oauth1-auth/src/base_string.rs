//! Construction of the OAuth signature base string.
//!
//! ```text
//! METHOD & percent-encode(URL) & percent-encode(parameter string)
//! ```
//!
//! The parameter string is the merge of the `oauth_*` protocol parameters and
//! the request parameters, each key and value percent-encoded once, sorted by
//! encoded key in byte order and joined as `key=value` pairs with `&`.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;

use oauth1_core::ActorCredential;
use tracing::debug;

use crate::encoding::{percent_encode, percent_encode_all};
use crate::params::RequestParams;

/// The only signature method this crate computes.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// The OAuth protocol version this crate computes.
pub const OAUTH_VERSION: &str = "1.0";

/// The `oauth_*` protocol parameters, with percent-encoded values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthBaseParams {
    params: BTreeMap<String, String>,
}

impl OAuthBaseParams {
    /// Iterate over `(name, encoded value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The encoded value of one parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Build the protocol parameters for one request.
///
/// `oauth_token` is included only when the actor has a non-empty token.
#[must_use]
pub fn build_base_params(
    actor: &ActorCredential,
    consumer_key: &str,
    timestamp: &str,
    nonce: &str,
) -> OAuthBaseParams {
    let mut params = BTreeMap::new();
    params.insert(
        "oauth_consumer_key".to_owned(),
        percent_encode(consumer_key),
    );
    params.insert("oauth_version".to_owned(), OAUTH_VERSION.to_owned());
    params.insert("oauth_timestamp".to_owned(), percent_encode(timestamp));
    params.insert("oauth_nonce".to_owned(), percent_encode(nonce));
    params.insert(
        "oauth_signature_method".to_owned(),
        SIGNATURE_METHOD.to_owned(),
    );

    if let Some(token) = actor.token() {
        params.insert("oauth_token".to_owned(), percent_encode(token));
    }

    OAuthBaseParams { params }
}

/// A finished signature base string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBaseString(String);

impl SignatureBaseString {
    /// The base string as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignatureBaseString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the normalized parameter string.
///
/// A sequence-valued request parameter contributes one `key=value` pair per
/// element. A request parameter whose encoded name equals a protocol
/// parameter replaces it.
#[must_use]
pub fn build_parameter_string(params: &RequestParams, base_params: &OAuthBaseParams) -> String {
    let mut merged: BTreeMap<String, Vec<String>> = base_params
        .iter()
        .map(|(k, v)| (k.to_owned(), vec![v.to_owned()]))
        .collect();

    for (name, value) in params.iter() {
        merged.insert(percent_encode(name), percent_encode_all(value.scalars()));
    }

    merged
        .iter()
        .flat_map(|(k, values)| values.iter().map(move |v| format!("{k}={v}")))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the signature base string for a request.
///
/// # Examples
///
/// ```
/// use oauth1_auth::base_string::{build_base_params, build_base_string};
/// use oauth1_auth::params::RequestParams;
/// use oauth1_core::ActorCredential;
///
/// let base = build_base_params(&ActorCredential::anonymous(), "ck", "1", "n");
/// let params: RequestParams = [("a", "b")].into_iter().collect();
/// let base_string = build_base_string("get", "http://example.com/", &params, &base);
/// assert!(base_string.as_str().starts_with("GET&http%3A%2F%2Fexample.com%2F&a%3Db%26"));
/// ```
#[must_use]
pub fn build_base_string(
    method: &str,
    url: &str,
    params: &RequestParams,
    base_params: &OAuthBaseParams,
) -> SignatureBaseString {
    let parameter_string = build_parameter_string(params, base_params);
    let base_string = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    );

    debug!(base_string, "Built OAuth signature base string");

    SignatureBaseString(base_string)
}

/// Scratch state for signing one request.
///
/// Holds the protocol parameters and builds the base string at most once.
/// A context is created per call and never shared, so nothing carries over
/// between requests.
#[derive(Debug)]
pub struct SigningContext<'a> {
    method: &'a str,
    url: &'a str,
    params: &'a RequestParams,
    base_params: OAuthBaseParams,
    base_string: OnceCell<SignatureBaseString>,
}

impl<'a> SigningContext<'a> {
    /// Create a context for one request.
    #[must_use]
    pub fn new(
        method: &'a str,
        url: &'a str,
        params: &'a RequestParams,
        base_params: OAuthBaseParams,
    ) -> Self {
        Self {
            method,
            url,
            params,
            base_params,
            base_string: OnceCell::new(),
        }
    }

    /// The protocol parameters.
    #[must_use]
    pub fn base_params(&self) -> &OAuthBaseParams {
        &self.base_params
    }

    /// The signature base string, built on first use.
    pub fn base_string(&self) -> &SignatureBaseString {
        self.base_string.get_or_init(|| {
            build_base_string(self.method, self.url, self.params, &self.base_params)
        })
    }
}
