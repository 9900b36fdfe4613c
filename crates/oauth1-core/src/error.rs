//! Error types for the validator core.

/// Core error type for credential and configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// No consumer credential has been installed in the store.
    #[error("consumer key and secret must be set before signing")]
    MissingConsumerCredential,
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
