//! Core error types for Crocodoc.

use thiserror::Error;

/// Errors raised by local checks, before any request is made.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid client configuration (missing token, bad URL, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A caller-supplied argument was rejected locally.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The session key or creation time was needed before activation.
    #[error("Session has not been activated; call activate_for_user first")]
    SessionNotActivated,

    /// Data that could not be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true if the error is a programming mistake on the caller's side.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidConfig(_) | CoreError::InvalidArgument(_) | CoreError::SessionNotActivated
        )
    }
}
