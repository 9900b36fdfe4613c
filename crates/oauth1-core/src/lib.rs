//! Credentials, configuration, and shared error types for the OAuth 1.0a validator.
//!
//! This crate holds the pieces that live longer than a single validation call:
//! the consumer credential (shared by every validator of one tenant), the
//! per-actor token credential, and the environment-driven configuration that
//! populates both.

mod config;
mod credentials;
mod error;

pub use config::{DEFAULT_MAX_CLOCK_SKEW, ValidatorConfig};
pub use credentials::{ActorCredential, ConsumerCredential, ConsumerStore};
pub use error::{CoreError, CoreResult};
