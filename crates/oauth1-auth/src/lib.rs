//! OAuth 1.0a HMAC-SHA1 signing and verification for inbound API requests.
//!
//! A [`Validator`] recomputes the canonical `Authorization` header from the
//! request method, URL and parameters together with the configured consumer
//! and token secrets, then compares it against the header the client sent.
//! The same building blocks sign outbound requests through [`sign_request`].
//!
//! Signing follows RFC 5849 with these conventions:
//!
//! - Parameters are percent-encoded with only `A-Z a-z 0-9 - . _ ~` left
//!   unescaped, and sorted by byte order of the encoded key.
//! - Sequence parameters expand into one `key=value` pair per element.
//! - Multipart bodies on non-GET requests are left out of the signature.
//! - The HMAC key is `consumer_secret&token_secret` without further encoding.

pub mod base_string;
pub mod encoding;
pub mod error;
pub mod header;
pub mod params;
pub mod request;
pub mod signature;
pub mod validator;

pub use error::{AuthError, RejectReason};
pub use header::{AuthorizationParams, split_authorization_params};
pub use params::{ParamValue, RawParams, RequestParams};
pub use request::ApiRequest;
pub use signature::{sign_request, signature_for};
pub use validator::{Validator, Verdict};

/// Crate version reported by the command-line tool.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
