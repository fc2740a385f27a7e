//! API error types.

use std::path::PathBuf;

use crocodoc_core::CoreError;
use thiserror::Error;

// ============================================================================
// API Error
// ============================================================================

/// Error type for every client operation.
///
/// HTTP status codes are mapped by [`crate::classify`]; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400: the service rejected the request parameters.
    #[error("400 Bad Request: invalid request parameters: {0}")]
    InvalidArgument(String),

    /// 401: the API token was missing or rejected.
    #[error("401 Unauthorized: invalid API token")]
    InvalidToken,

    /// 404: unknown API method or resource.
    #[error("404 Not Found: API method not found")]
    NotFound,

    /// 405: wrong HTTP method for the API call.
    #[error("405 Method Not Allowed: invalid HTTP request type for method")]
    MethodNotAllowed,

    /// 5xx: the service failed.
    #[error("{status} Server Error")]
    Server {
        /// HTTP status code.
        status: u16,
    },

    /// Any other non-success status.
    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The service answered 200 but reported an error in the body.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// A success body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local file to upload does not exist.
    #[error("File does not exist at path: {}", .0.display())]
    FileNotFound(PathBuf),

    /// HTTP transport failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local precondition failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Returns true if the error was raised locally, before any request.
    pub fn is_usage_error(&self) -> bool {
        match self {
            ApiError::FileNotFound(_) => true,
            ApiError::Core(e) => e.is_usage_error(),
            _ => false,
        }
    }

    /// Returns the HTTP status code this error was mapped from, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::InvalidArgument(_) => Some(400),
            ApiError::InvalidToken => Some(401),
            ApiError::NotFound => Some(404),
            ApiError::MethodNotAllowed => Some(405),
            ApiError::Server { status } | ApiError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
