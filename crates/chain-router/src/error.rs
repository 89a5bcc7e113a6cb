//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
///
/// These are programmer errors: they are returned synchronously and never
/// travel along a chain's error channel.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Dispatch was attempted against a method that was never enabled.
    #[error("router has no method {method}")]
    MethodNotFound { method: String },

    /// A pre-compiled path does not expose a usable exact-match test.
    #[error("paths should be precompiled; {pattern} is not in the correct format")]
    InvalidFormat { pattern: String },

    /// A string pattern could not be compiled.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    /// No enabled method materialized this registration verb.
    #[error("unknown registration verb: {0}")]
    UnknownVerb(String),

    /// Router configuration could not be parsed.
    #[error("invalid router configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// An error raised by a handler and carried along the error channel.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
