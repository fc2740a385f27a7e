//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use crocodoc_client::{ConversionStatus, StatusSnapshot, ViewingSession};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutput {
    pub uuid: String,
    pub status: ConversionStatus,
    pub viewable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DocumentOutput {
    /// Builds the output for a document id and its status.
    pub fn new(uuid: &str, snapshot: &StatusSnapshot) -> Self {
        Self {
            uuid: uuid.to_string(),
            status: snapshot.status,
            viewable: snapshot.viewable,
            error: snapshot.error.clone(),
            refreshed_at: snapshot.refreshed_at,
        }
    }
}

/// JSON output for an activated viewing session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutput {
    pub uuid: String,
    pub key: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub seconds_remaining: i64,
}

impl SessionOutput {
    /// Builds the output for an activated session.
    pub fn from_session(session: &ViewingSession) -> Result<Self> {
        Ok(Self {
            uuid: session.document_id().to_string(),
            key: session.key()?.to_string(),
            url: session.viewing_url()?,
            created_at: session.created_at()?,
            seconds_remaining: session.seconds_remaining()?,
        })
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats document statuses; a single document is not wrapped in an array.
    pub fn format_documents(&self, documents: &[DocumentOutput]) -> Result<String> {
        match documents {
            [single] => self.format(single),
            many => self.format(&many),
        }
    }
}
