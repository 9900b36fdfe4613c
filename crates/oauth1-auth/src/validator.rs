//! OAuth 1.0a request verification.
//!
//! Verification runs these checks in order and stops at the first failure:
//!
//! 1. The header starts with `OAuth `.
//! 2. All six required `oauth_*` parameters are present.
//! 3. `oauth_signature_method` is `HMAC-SHA1`.
//! 4. `oauth_timestamp` is within the clock-skew window of the server clock.
//! 5. `oauth_version` is `1.0`.
//! 6. The canonical header recomputed from the request, the configured
//!    credentials and the client's timestamp and nonce equals the supplied
//!    header byte for byte.
//!
//! The whole header is compared, not just `oauth_signature`, so a header
//! that is correctly signed but not in canonical form (unsorted, extra
//! `realm`, different quoting) is rejected. Nonces are not remembered;
//! replay protection is bounded only by the clock-skew window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use oauth1_core::{ActorCredential, ConsumerStore, DEFAULT_MAX_CLOCK_SKEW, ValidatorConfig};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::base_string::{OAUTH_VERSION, SIGNATURE_METHOD};
use crate::error::{AuthError, RejectReason};
use crate::header::split_authorization_params;
use crate::params::RawParams;
use crate::request::ApiRequest;
use crate::signature::authorization_for;

/// Outcome of verifying one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The supplied header matches the recomputed one.
    Accepted,
    /// The request failed a check.
    Rejected(RejectReason),
}

impl Verdict {
    /// Whether the request was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Verifies OAuth 1.0a HMAC-SHA1 signed requests for one actor.
///
/// The consumer credential comes from a shared [`ConsumerStore`]; the actor
/// credential belongs to this validator. A validator holds no per-request
/// state, so one instance can serve concurrent calls.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use oauth1_auth::{ApiRequest, Validator, sign_request};
/// use oauth1_core::{ActorCredential, ConsumerCredential, ConsumerStore};
///
/// let consumer = ConsumerCredential::new("ck", "cs");
/// let validator = Validator::new(Arc::new(ConsumerStore::with_credential(consumer.clone())));
///
/// let timestamp = chrono::Utc::now().timestamp().to_string();
/// let request = ApiRequest::new("GET", "http://example.com/api", "foo=bar");
/// let actor = ActorCredential::anonymous();
/// let header = sign_request(&request, &consumer, &actor, &timestamp, "n1").unwrap();
///
/// let url = "http://example.com/api";
/// assert!(validator.validate(&header, "GET", url, "foo=bar", false).unwrap());
/// assert!(!validator.validate(&header, "GET", url, "foo=baz", false).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    consumers: Arc<ConsumerStore>,
    actor: ActorCredential,
    max_clock_skew: u64,
}

impl Validator {
    /// Create a validator for two-legged requests.
    #[must_use]
    pub fn new(consumers: Arc<ConsumerStore>) -> Self {
        Self {
            consumers,
            actor: ActorCredential::anonymous(),
            max_clock_skew: DEFAULT_MAX_CLOCK_SKEW,
        }
    }

    /// Create a validator, and the consumer store it reads, from configuration.
    #[must_use]
    pub fn from_config(config: &ValidatorConfig) -> Self {
        let consumers = match &config.consumer {
            Some(credential) => ConsumerStore::with_credential(credential.clone()),
            None => ConsumerStore::new(),
        };
        Self::new(Arc::new(consumers))
            .with_actor(config.actor.clone())
            .with_max_clock_skew(config.max_clock_skew)
    }

    /// Use the given actor credential.
    #[must_use]
    pub fn with_actor(mut self, actor: ActorCredential) -> Self {
        self.actor = actor;
        self
    }

    /// Set the request or access token and its secret.
    pub fn set_token(&mut self, token: impl Into<String>, token_secret: impl Into<String>) {
        self.actor = ActorCredential::new(token, token_secret);
    }

    /// Change the accepted clock difference, in seconds.
    #[must_use]
    pub fn with_max_clock_skew(mut self, seconds: u64) -> Self {
        self.max_clock_skew = seconds;
        self
    }

    /// The consumer store this validator reads.
    #[must_use]
    pub fn consumers(&self) -> &Arc<ConsumerStore> {
        &self.consumers
    }

    /// The actor credential this validator signs with.
    #[must_use]
    pub fn actor(&self) -> &ActorCredential {
        &self.actor
    }

    /// Validate a request and return whether it is authentic.
    ///
    /// `params` may be structured parameters or a query string. With
    /// `multipart` set on a non-GET request the parameters are left out of
    /// the signature.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`] only when no consumer
    /// credential is configured. Every other failure yields `Ok(false)`.
    pub fn validate(
        &self,
        authorization: &str,
        method: &str,
        url: &str,
        params: impl Into<RawParams>,
        multipart: bool,
    ) -> Result<bool, AuthError> {
        let request = ApiRequest::new(method, url, params).with_multipart(multipart);
        self.verify(authorization, &request)
            .map(|verdict| verdict.is_accepted())
    }

    /// Verify a request against the current server time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`] only when no consumer
    /// credential is configured.
    pub fn verify(&self, authorization: &str, request: &ApiRequest) -> Result<Verdict, AuthError> {
        self.verify_at(authorization, request, Utc::now())
    }

    /// Verify a request as if the server clock read `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`] only when no consumer
    /// credential is configured.
    pub fn verify_at(
        &self,
        authorization: &str,
        request: &ApiRequest,
        now: DateTime<Utc>,
    ) -> Result<Verdict, AuthError> {
        let Ok(params) = split_authorization_params(authorization) else {
            return Ok(reject(RejectReason::NotOAuth));
        };

        if let Some(name) = params.first_missing_required() {
            return Ok(reject(RejectReason::MissingParam(name)));
        }

        // Presence of every required parameter was checked above.
        let field = |name: &str| params.get(name).unwrap_or_default();

        let signature_method = field("signature_method");
        if signature_method != SIGNATURE_METHOD {
            return Ok(reject(RejectReason::BadMethod(signature_method.to_owned())));
        }

        let timestamp = field("timestamp");
        let Ok(client_time) = timestamp.parse::<i64>() else {
            return Ok(reject(RejectReason::InvalidTimestamp(timestamp.to_owned())));
        };
        let difference = now.timestamp().abs_diff(client_time);
        if difference > self.max_clock_skew {
            return Ok(reject(RejectReason::ClockSkew { difference }));
        }

        let version = field("version");
        if version != OAUTH_VERSION {
            return Ok(reject(RejectReason::BadVersion(version.to_owned())));
        }

        let consumer = self.consumers.snapshot();
        let nonce = field("nonce");

        debug!(
            consumer_key = %field("consumer_key"),
            nonce = %nonce,
            timestamp = %timestamp,
            method = %request.method(),
            url = %request.url(),
            multipart = request.is_multipart(),
            "Verifying OAuth signature"
        );

        let expected =
            authorization_for(request, consumer.as_deref(), &self.actor, timestamp, nonce)?;

        if expected.as_bytes().ct_eq(authorization.as_bytes()).into() {
            debug!(consumer_key = %field("consumer_key"), "OAuth verification succeeded");
            Ok(Verdict::Accepted)
        } else {
            debug!(
                expected = %expected,
                provided = %authorization,
                "OAuth authorization mismatch"
            );
            Ok(reject(RejectReason::SignatureMismatch))
        }
    }
}

fn reject(reason: RejectReason) -> Verdict {
    warn!(reason = reason.code(), detail = %reason, "Rejecting OAuth request");
    Verdict::Rejected(reason)
}
