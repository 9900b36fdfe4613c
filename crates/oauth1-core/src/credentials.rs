//! Consumer and actor credentials.
//!
//! The [`ConsumerCredential`] identifies the registered application and is
//! shared by every validator serving that application. It lives in a
//! [`ConsumerStore`] so it can be rotated while validators keep running:
//! each signing operation takes one [`Arc`] snapshot and works with that
//! version until it finishes.
//!
//! The [`ActorCredential`] identifies the user on whose behalf a request is
//! made. It is empty for two-legged (application only) requests.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::{CoreError, CoreResult};

/// The application's consumer key and secret.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ConsumerCredential {
    consumer_key: String,
    consumer_secret: String,
}

impl ConsumerCredential {
    /// Create a new consumer credential.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// The public consumer key sent as `oauth_consumer_key`.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// The shared consumer secret used to key the HMAC.
    #[must_use]
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }
}

impl fmt::Debug for ConsumerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredential")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// The request or access token of one authenticated actor.
#[derive(Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ActorCredential {
    token: Option<String>,
    token_secret: Option<String>,
}

impl ActorCredential {
    /// Create an actor credential from a token and its secret.
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            token_secret: Some(token_secret.into()),
        }
    }

    /// An empty credential for two-legged requests.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The token to include as `oauth_token`, if there is a non-empty one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// The token secret, or an empty string when none is set.
    #[must_use]
    pub fn token_secret(&self) -> &str {
        self.token_secret.as_deref().unwrap_or("")
    }
}

impl fmt::Debug for ActorCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorCredential")
            .field("token", &self.token)
            .field(
                "token_secret",
                &self.token_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Rotatable holder for one tenant's [`ConsumerCredential`].
///
/// Writers are serialized by the lock; readers clone the inner [`Arc`] and
/// release the lock immediately, so a credential swap never blocks an
/// in-flight signature computation.
///
/// # Examples
///
/// ```
/// use oauth1_core::ConsumerStore;
///
/// let store = ConsumerStore::new();
/// assert!(store.require().is_err());
///
/// store.set("ck", "cs");
/// assert_eq!(store.require().unwrap().consumer_key(), "ck");
/// ```
#[derive(Debug, Default)]
pub struct ConsumerStore {
    current: RwLock<Option<Arc<ConsumerCredential>>>,
}

impl ConsumerStore {
    /// Create an empty store. Signing fails until a credential is set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a credential.
    #[must_use]
    pub fn with_credential(credential: ConsumerCredential) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(credential))),
        }
    }

    /// Set (or overwrite) the consumer key and secret.
    pub fn set(&self, consumer_key: impl Into<String>, consumer_secret: impl Into<String>) {
        self.replace(ConsumerCredential::new(consumer_key, consumer_secret));
    }

    /// Swap in a new credential, returning the previous one.
    pub fn replace(&self, credential: ConsumerCredential) -> Option<Arc<ConsumerCredential>> {
        info!(consumer_key = %credential.consumer_key, "installing consumer credential");
        self.current.write().replace(Arc::new(credential))
    }

    /// The credential currently installed, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<ConsumerCredential>> {
        self.current.read().clone()
    }

    /// The credential currently installed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingConsumerCredential`] if nothing has been set.
    pub fn require(&self) -> CoreResult<Arc<ConsumerCredential>> {
        self.snapshot().ok_or(CoreError::MissingConsumerCredential)
    }
}
