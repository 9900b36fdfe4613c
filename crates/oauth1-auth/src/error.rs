//! Error and rejection types for OAuth 1.0a verification.
//!
//! Two kinds of failure are kept apart. [`AuthError`] means the
//! validator itself cannot work (no consumer secret configured) and is
//! returned as `Err`. [`RejectReason`] means the request is not authentic and
//! is reported inside a successful [`Verdict`](crate::Verdict).

use oauth1_core::CoreError;

/// Errors that prevent a signature from being computed at all.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` value does not start with `OAuth `.
    #[error("authorization header must start with \"OAuth \"")]
    MalformedHeader,

    /// The consumer secret is unset, so no HMAC key can be derived.
    #[error("consumer secret must be set to generate a signature")]
    MissingCredential,

    /// Credential store or configuration failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// The `Authorization` value is not an OAuth header.
    #[error("invalid authorization string supplied")]
    NotOAuth,

    /// A required `oauth_*` parameter is absent from the header.
    #[error("required authorization parameter missing: {0}")]
    MissingParam(&'static str),

    /// `oauth_signature_method` is not `HMAC-SHA1`.
    #[error("OAuth signature method must be HMAC-SHA1, got {0:?}")]
    BadMethod(String),

    /// `oauth_timestamp` is not an integer.
    #[error("OAuth timestamp is not a number: {0:?}")]
    InvalidTimestamp(String),

    /// Client and server clocks are too far apart.
    #[error("too much difference between client and server time ({difference} seconds)")]
    ClockSkew {
        /// Absolute difference in seconds.
        difference: u64,
    },

    /// `oauth_version` is not `1.0`.
    #[error("OAuth version must be 1.0, got {0:?}")]
    BadVersion(String),

    /// All checks passed but the recomputed header differs.
    #[error("authorization header does not match the expected signature")]
    SignatureMismatch,
}

impl RejectReason {
    /// Short machine-readable code for logs and error responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotOAuth => "not_oauth",
            Self::MissingParam(_) => "missing_param",
            Self::BadMethod(_) => "bad_method",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::ClockSkew { .. } => "clock_skew",
            Self::BadVersion(_) => "bad_version",
            Self::SignatureMismatch => "signature_mismatch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_reject_reasons() {
        assert_eq!(
            RejectReason::MissingParam("nonce").to_string(),
            "required authorization parameter missing: nonce"
        );
        assert_eq!(
            RejectReason::ClockSkew { difference: 181 }.to_string(),
            "too much difference between client and server time (181 seconds)"
        );
        assert_eq!(
            RejectReason::ClockSkew { difference: 1 }.code(),
            "clock_skew"
        );
    }

    #[test]
    fn test_should_wrap_core_errors() {
        let err = AuthError::from(CoreError::MissingConsumerCredential);
        assert!(matches!(
            err,
            AuthError::Core(CoreError::MissingConsumerCredential)
        ));
    }
}
