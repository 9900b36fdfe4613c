//! Shared fixtures for the verification tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use chrono::{DateTime, TimeZone, Utc};
use oauth1_auth::Validator;
use oauth1_core::{ConsumerCredential, ConsumerStore};

static INIT: Once = Once::new();

/// Server clock used by the fixed-time tests.
pub const NOW: i64 = 1_700_000_000;

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The consumer every fixture signs with.
#[must_use]
pub fn consumer() -> ConsumerCredential {
    ConsumerCredential::new("ck", "cs")
}

/// A two-legged validator for [`consumer`].
#[must_use]
pub fn validator() -> Validator {
    init_tracing();
    Validator::new(Arc::new(ConsumerStore::with_credential(consumer())))
}

/// `NOW` shifted by `offset` seconds.
#[must_use]
pub fn at(offset: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(NOW + offset, 0).unwrap()
}

/// Drop the `oauth_<name>` entry from a rendered header.
#[must_use]
pub fn without_param(header: &str, name: &str) -> String {
    let body = header.strip_prefix("OAuth ").unwrap();
    let prefix = format!("oauth_{name}=");
    let kept: Vec<&str> = body
        .split(", ")
        .filter(|entry| !entry.starts_with(&prefix))
        .collect();
    format!("OAuth {}", kept.join(", "))
}
