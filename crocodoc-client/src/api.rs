//! Wire types for Crocodoc API replies.

use chrono::{DateTime, Utc};
use crocodoc_core::{ConversionStatus, StatusSnapshot};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

// ============================================================================
// Endpoints
// ============================================================================

/// Upload a file or URL.
pub const UPLOAD_ENDPOINT: &str = "document/upload";

/// Single or batched document status.
pub const STATUS_ENDPOINT: &str = "document/status";

/// Delete a document.
pub const DELETE_ENDPOINT: &str = "document/delete";

/// Download the original or a PDF rendition.
pub const DOWNLOAD_DOCUMENT_ENDPOINT: &str = "download/document";

/// Download a thumbnail.
pub const DOWNLOAD_THUMBNAIL_ENDPOINT: &str = "download/thumbnail";

/// Download extracted text.
pub const DOWNLOAD_TEXT_ENDPOINT: &str = "download/text";

/// Create a viewing session.
pub const SESSION_CREATE_ENDPOINT: &str = "session/create";

// ============================================================================
// Response Types
// ============================================================================

/// Reply to `document/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// Id of the new document.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Error message when the upload was refused.
    #[serde(default, deserialize_with = "string_or_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    /// Returns the new document id, or the service's refusal as an error.
    pub fn into_uuid(self) -> Result<String, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::Rejected(error));
        }
        self.uuid
            .filter(|uuid| !uuid.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("upload reply has no uuid".to_string()))
    }
}

/// One entry of a `document/status` reply.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRecord {
    /// Document id.
    #[serde(default)]
    pub uuid: String,
    /// Raw status string (`QUEUED`, `DONE`, `ERROR`, ...).
    #[serde(default, deserialize_with = "string_or_none")]
    pub status: Option<String>,
    /// Whether the document can be viewed.
    #[serde(default)]
    pub viewable: Option<bool>,
    /// Conversion error detail.
    #[serde(default, deserialize_with = "string_or_none")]
    pub error: Option<String>,
}

impl StatusRecord {
    /// Converts the record into a snapshot fetched at `at`.
    pub fn to_snapshot(&self, at: DateTime<Utc>) -> StatusSnapshot {
        StatusSnapshot::new(
            ConversionStatus::from_api(self.status.as_deref()),
            self.viewable.unwrap_or(false),
            self.error.clone(),
            at,
        )
    }
}

/// Parses a `document/status` reply.
///
/// The service answers with an array of records, or with an object carrying
/// an `error` when the whole request is refused.
pub fn parse_status_reply(value: Value) -> Result<Vec<StatusRecord>, ApiError> {
    if let Some(error) = value
        .get("error")
        .and_then(Value::as_str)
        .filter(|_| value.get("uuid").is_none())
    {
        return Err(ApiError::Rejected(error.to_string()));
    }
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(ApiError::InvalidResponse(format!(
            "unexpected status reply: {other}"
        ))),
    }
}

/// Reply to `session/create`.
#[derive(Debug, Deserialize)]
pub struct SessionCreateResponse {
    /// Session key.
    #[serde(default)]
    pub session: Option<String>,
    /// Error message when the session was refused.
    #[serde(default, deserialize_with = "string_or_none")]
    pub error: Option<String>,
}

impl SessionCreateResponse {
    /// Returns the session key, or the service's refusal as an error.
    pub fn into_key(self) -> Result<String, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::Rejected(error));
        }
        self.session
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("session reply has no key".to_string()))
    }
}

/// Accepts a string; anything else (`false`, `null`, numbers) reads as absent.
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

// ============================================================================
// Tests
// ============================================================================
