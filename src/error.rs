//! Error types for a3s-pubsub
//!
//! Registry operations report bad arguments through sentinel return values
//! (error handles, `false`, `0`). `PubSubError` covers the surfaces around
//! the table: configuration and runtime availability.

use thiserror::Error;

/// Errors that can occur outside the subscription table itself
#[derive(Debug, Error)]
pub enum PubSubError {
    /// Invalid registry configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No tokio runtime was available to schedule callbacks on
    #[error("No tokio runtime available to schedule {pending} callback(s) for '{subscriptions}'")]
    NoRuntime {
        subscriptions: String,
        pending: usize,
    },

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for pubsub operations
pub type Result<T> = std::result::Result<T, PubSubError>;
