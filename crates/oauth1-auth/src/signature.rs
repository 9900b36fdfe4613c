//! HMAC-SHA1 signing and canonical `Authorization` header construction.
//!
//! The signature is `Base64(HMAC-SHA1(key, base_string))` with
//!
//! ```text
//! key = consumer_secret + "&" + token_secret
//! ```
//!
//! where a missing token secret contributes the empty string.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use oauth1_core::{ActorCredential, ConsumerCredential};
use sha1::Sha1;
use tracing::debug;

use crate::base_string::{OAuthBaseParams, SigningContext, build_base_params};
use crate::encoding::percent_encode;
use crate::error::AuthError;
use crate::header::OAUTH_PREFIX;
use crate::request::ApiRequest;

type HmacSha1 = Hmac<Sha1>;

/// Compute the base64 `oauth_signature` value for a base string.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredential`] if `consumer_secret` is `None`.
///
/// # Examples
///
/// ```
/// use oauth1_auth::signature::sign;
///
/// let signature = sign("GET&http%3A%2F%2Fexample.com%2F&", Some("cs"), None).unwrap();
/// assert_eq!(signature.len(), 28);
/// ```
pub fn sign(
    base_string: &str,
    consumer_secret: Option<&str>,
    token_secret: Option<&str>,
) -> Result<String, AuthError> {
    let consumer_secret = consumer_secret.ok_or(AuthError::MissingCredential)?;
    let key = signing_key(consumer_secret, token_secret.unwrap_or(""));
    Ok(compute_hmac_sha1(&key, base_string))
}

/// Compute the percent-encoded signature, ready to embed in a header.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredential`] if `consumer_secret` is `None`.
pub fn sign_encoded(
    base_string: &str,
    consumer_secret: Option<&str>,
    token_secret: Option<&str>,
) -> Result<String, AuthError> {
    sign(base_string, consumer_secret, token_secret).map(|s| percent_encode(&s))
}

fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!("{consumer_secret}&{token_secret}")
}

/// Compute `Base64(HMAC-SHA1(key, data))`.
fn compute_hmac_sha1(key: &str, data: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(data.as_bytes());
    let result = mac.finalize().into_bytes();
    BASE64.encode(result)
}

/// Render the canonical header: every protocol parameter plus the signature,
/// sorted by name, as `OAuth k1="v1", k2="v2"`.
#[must_use]
pub fn render_authorization(base_params: &OAuthBaseParams, signature: &str) -> String {
    let encoded_signature = percent_encode(signature);

    let mut params: BTreeMap<&str, &str> = base_params.iter().collect();
    params.insert("oauth_signature", &encoded_signature);

    let header_parts: Vec<String> = params.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
    format!("{OAUTH_PREFIX}{}", header_parts.join(", "))
}

/// Build the signing context for a request with the given timestamp and nonce.
fn signing_context<'a>(
    request: &'a ApiRequest,
    consumer_key: &str,
    actor: &ActorCredential,
    timestamp: &str,
    nonce: &str,
) -> SigningContext<'a> {
    let base_params = build_base_params(actor, consumer_key, timestamp, nonce);
    SigningContext::new(
        request.method(),
        request.url(),
        request.signing_params(),
        base_params,
    )
}

/// Create the canonical `Authorization` header value for a request.
///
/// The multipart rule of [`ApiRequest::signing_params`] applies. Validation
/// recomputes the header through the same path, using the timestamp and
/// nonce the client sent.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredential`] if no consumer secret can be
/// derived.
///
/// # Examples
///
/// ```
/// use oauth1_auth::{ApiRequest, sign_request};
/// use oauth1_core::{ActorCredential, ConsumerCredential};
///
/// let request = ApiRequest::new("GET", "http://example.com/api", "foo=bar");
/// let header = sign_request(
///     &request,
///     &ConsumerCredential::new("ck", "cs"),
///     &ActorCredential::anonymous(),
///     "1700000000",
///     "abc123",
/// )
/// .unwrap();
/// assert!(header.starts_with(r#"OAuth oauth_consumer_key="ck", oauth_nonce="abc123""#));
/// ```
pub fn sign_request(
    request: &ApiRequest,
    consumer: &ConsumerCredential,
    actor: &ActorCredential,
    timestamp: &str,
    nonce: &str,
) -> Result<String, AuthError> {
    authorization_for(request, Some(consumer), actor, timestamp, nonce)
}

/// Compute the percent-encoded `oauth_signature` for a request without
/// rendering a header.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredential`] if no consumer secret can be
/// derived.
pub fn signature_for(
    request: &ApiRequest,
    consumer: &ConsumerCredential,
    actor: &ActorCredential,
    timestamp: &str,
    nonce: &str,
) -> Result<String, AuthError> {
    let context = signing_context(request, consumer.consumer_key(), actor, timestamp, nonce);
    compute_signature(&context, Some(consumer.consumer_secret()), actor).map(|s| percent_encode(&s))
}

/// Render the canonical header for a request signed by `consumer`, if any.
pub(crate) fn authorization_for(
    request: &ApiRequest,
    consumer: Option<&ConsumerCredential>,
    actor: &ActorCredential,
    timestamp: &str,
    nonce: &str,
) -> Result<String, AuthError> {
    let consumer_key = consumer.map_or("", ConsumerCredential::consumer_key);
    let context = signing_context(request, consumer_key, actor, timestamp, nonce);
    let signature = compute_signature(
        &context,
        consumer.map(ConsumerCredential::consumer_secret),
        actor,
    )?;
    Ok(render_authorization(context.base_params(), &signature))
}

fn compute_signature(
    context: &SigningContext<'_>,
    consumer_secret: Option<&str>,
    actor: &ActorCredential,
) -> Result<String, AuthError> {
    let signature = sign(
        context.base_string().as_str(),
        consumer_secret,
        Some(actor.token_secret()),
    )?;
    debug!(signature = %signature, "Computed OAuth signature");
    Ok(signature)
}
