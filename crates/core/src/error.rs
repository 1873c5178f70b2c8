//! Error types for the Redraft CLI.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, usage/input, I/O, change-engine, and
//! remote-repository errors. Callers can match on the variant to distinguish
//! "bad input" from "collaborator unavailable" instead of parsing messages.

use thiserror::Error;

/// Unified error type for the Redraft CLI.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (missing credential, bad config file).
    /// Fatal at startup; no work is attempted.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Usage and input errors (bad reference, file not found)
    #[error("Usage error: {0}")]
    Usage(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Change-engine errors (request failed, empty or malformed replacement)
    #[error("Engine error: {0}")]
    Engine(String),

    /// Remote repository errors (clone, commit, push, pull-request)
    #[error("Remote error: {0}")]
    Remote(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_messages() {
        let err = AppError::Usage("file not found: /tmp/missing.py".to_string());
        assert_eq!(err.to_string(), "Usage error: file not found: /tmp/missing.py");

        let err = AppError::Engine("empty replacement".to_string());
        assert!(err.to_string().starts_with("Engine error"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
