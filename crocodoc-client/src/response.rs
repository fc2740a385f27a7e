//! Response classification.
//!
//! Every remote operation funnels its [`RawResponse`] through [`classify`],
//! which turns error statuses into typed [`ApiError`]s and decodes JSON
//! bodies by content type.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::RawResponse;

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// JSON body (content type ending in `json`).
    Json(Value),
    /// Anything else, passed through untouched.
    Raw(Bytes),
}

impl ResponseBody {
    /// Deserializes the body into `T`.
    ///
    /// Raw bodies are parsed as JSON too; some endpoints omit the content type.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value)?),
            Self::Raw(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }

    /// Returns the body as text.
    pub fn into_text(self) -> String {
        match self {
            Self::Json(Value::String(text)) => text,
            Self::Json(value) => value.to_string(),
            Self::Raw(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Returns the body as bytes.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Json(value) => Bytes::from(value.to_string()),
            Self::Raw(bytes) => bytes,
        }
    }
}

/// Maps a raw response to its body or to the error its status denotes.
pub fn classify(response: RawResponse) -> Result<ResponseBody, ApiError> {
    match response.status {
        200..=299 => {
            if response.is_json() {
                Ok(ResponseBody::Json(serde_json::from_slice(&response.body)?))
            } else {
                Ok(ResponseBody::Raw(response.body))
            }
        }
        400 => Err(ApiError::InvalidArgument(response.text())),
        401 => Err(ApiError::InvalidToken),
        404 => Err(ApiError::NotFound),
        405 => Err(ApiError::MethodNotAllowed),
        status @ 500..=599 => Err(ApiError::Server { status }),
        status => Err(ApiError::UnexpectedStatus { status }),
    }
}

// ============================================================================
// Tests
// ============================================================================
