//! Configuration management for the validator.
//!
//! All configuration is driven by environment variables.

use crate::credentials::{ActorCredential, ConsumerCredential};
use crate::error::{CoreError, CoreResult};

/// Default allowed difference between client and server clocks, in seconds.
pub const DEFAULT_MAX_CLOCK_SKEW: u64 = 180;

/// Global configuration for the validator.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ValidatorConfig {
    /// Consumer credential of the registered application.
    pub consumer: Option<ConsumerCredential>,
    /// Token credential of the actor, empty for two-legged requests.
    #[serde(default)]
    pub actor: ActorCredential,
    /// Maximum accepted `|now - oauth_timestamp|`, in seconds.
    #[serde(default = "default_max_clock_skew")]
    pub max_clock_skew: u64,
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_clock_skew() -> u64 {
    DEFAULT_MAX_CLOCK_SKEW
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            consumer: None,
            actor: ActorCredential::anonymous(),
            max_clock_skew: DEFAULT_MAX_CLOCK_SKEW,
            log_level: default_log_level(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OAUTH_CONSUMER_KEY` | *(unset)* |
    /// | `OAUTH_CONSUMER_SECRET` | *(unset)* |
    /// | `OAUTH_TOKEN` | *(unset)* |
    /// | `OAUTH_TOKEN_SECRET` | *(unset)* |
    /// | `OAUTH_MAX_CLOCK_SKEW` | `180` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if only one half of a key/secret pair is
    /// set or the clock skew is not a non-negative integer.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();

        match (lookup("OAUTH_CONSUMER_KEY"), lookup("OAUTH_CONSUMER_SECRET")) {
            (Some(key), Some(secret)) => {
                config.consumer = Some(ConsumerCredential::new(key, secret));
            }
            (None, None) => {}
            _ => {
                return Err(CoreError::Config(
                    "OAUTH_CONSUMER_KEY and OAUTH_CONSUMER_SECRET must be set together".to_owned(),
                ));
            }
        }

        match (lookup("OAUTH_TOKEN"), lookup("OAUTH_TOKEN_SECRET")) {
            (Some(token), secret) => {
                config.actor = ActorCredential::new(token, secret.unwrap_or_default());
            }
            (None, None) => {}
            (None, Some(_)) => {
                return Err(CoreError::Config(
                    "OAUTH_TOKEN_SECRET is set without OAUTH_TOKEN".to_owned(),
                ));
            }
        }

        if let Some(v) = lookup("OAUTH_MAX_CLOCK_SKEW") {
            config.max_clock_skew = v.trim().parse().map_err(|_| {
                CoreError::Config(format!("OAUTH_MAX_CLOCK_SKEW must be a number of seconds, got {v:?}"))
            })?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = ValidatorConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.consumer.is_none());
        assert_eq!(config.actor.token(), None);
        assert_eq!(config.max_clock_skew, 180);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_load_credentials_from_variables() {
        let config = ValidatorConfig::from_lookup(lookup_from(&[
            ("OAUTH_CONSUMER_KEY", "ck"),
            ("OAUTH_CONSUMER_SECRET", "cs"),
            ("OAUTH_TOKEN", "tok"),
            ("OAUTH_TOKEN_SECRET", "ts"),
            ("OAUTH_MAX_CLOCK_SKEW", "60"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        let consumer = config.consumer.unwrap();
        assert_eq!(consumer.consumer_key(), "ck");
        assert_eq!(consumer.consumer_secret(), "cs");
        assert_eq!(config.actor.token(), Some("tok"));
        assert_eq!(config.actor.token_secret(), "ts");
        assert_eq!(config.max_clock_skew, 60);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_should_reject_half_configured_consumer() {
        let result = ValidatorConfig::from_lookup(lookup_from(&[("OAUTH_CONSUMER_KEY", "ck")]));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_should_reject_token_secret_without_token() {
        let result = ValidatorConfig::from_lookup(lookup_from(&[("OAUTH_TOKEN_SECRET", "ts")]));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_should_reject_invalid_clock_skew() {
        let result =
            ValidatorConfig::from_lookup(lookup_from(&[("OAUTH_MAX_CLOCK_SKEW", "three minutes")]));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_should_deserialize_with_defaults() {
        let config: ValidatorConfig = serde_json::from_str(
            r#"{"consumer":{"consumer_key":"ck","consumer_secret":"cs"}}"#,
        )
        .unwrap();
        assert_eq!(config.consumer.unwrap().consumer_key(), "ck");
        assert_eq!(config.max_clock_skew, DEFAULT_MAX_CLOCK_SKEW);
        assert_eq!(config.log_level, "info");
    }
}
