//! Documents stored on the service.

use std::path::Path;

use chrono::{DateTime, Utc};
use crocodoc_core::{AnnotationFilter, CoreError, SessionOptions, StatusCache, StatusSnapshot};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::api::{self, StatusRecord};
use crate::client::CrocodocClient;
use crate::error::ApiError;
use crate::response::ResponseBody;
use crate::session::ViewingSession;
use crate::transport::ApiRequest;

/// Default maximum thumbnail edge in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 100;

/// Largest thumbnail edge the service renders.
pub const MAX_THUMBNAIL_SIZE: u32 = 300;

/// Separates pages in extracted text.
const PAGE_SEPARATOR: char = '\u{000C}';

// ============================================================================
// Document
// ============================================================================

/// A document on the service, identified by its uuid.
///
/// The last fetched status is memoized for the client's refresh threshold.
/// Reads that may refresh take `&mut self`; share a document across tasks
/// behind a lock.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    client: CrocodocClient,
    cache: StatusCache,
}

impl Document {
    /// Wraps a known document id.
    pub(crate) fn new(client: CrocodocClient, id: impl Into<String>) -> Result<Self, ApiError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("document id must not be empty".to_string()).into());
        }
        let cache = StatusCache::new(client.status_refresh_threshold());
        Ok(Self { id, client, cache })
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the client this document talks through.
    pub fn client(&self) -> &CrocodocClient {
        &self.client
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Returns the conversion status, fetching it if the memoized value is
    /// missing, stale, or `force_refresh` is set.
    #[instrument(skip(self), fields(uuid = %self.id))]
    pub async fn status(&mut self, force_refresh: bool) -> Result<StatusSnapshot, ApiError> {
        if !self.cache.needs_refresh(force_refresh) {
            debug!("Using memoized status");
            return Ok(self.cache.snapshot().clone());
        }

        let records = self.client.fetch_statuses(&[self.id.as_str()]).await?;
        let record = records
            .iter()
            .find(|record| record.uuid == self.id)
            .or_else(|| records.first())
            .ok_or_else(|| ApiError::InvalidResponse("status reply has no records".to_string()))?;

        self.apply_status_at(record, Utc::now());
        debug!(status = %self.cache.snapshot().status, "Status refreshed");
        Ok(self.cache.snapshot().clone())
    }

    /// Returns the memoized status without contacting the service.
    pub fn cached_status(&self) -> &StatusSnapshot {
        self.cache.snapshot()
    }

    /// Replaces the memoized status with a record received at `at`.
    pub(crate) fn apply_status_at(&mut self, record: &StatusRecord, at: DateTime<Utc>) {
        self.cache.store(record.to_snapshot(at));
    }

    /// Returns true if the document can be opened in the viewer.
    pub async fn viewable(&mut self) -> Result<bool, ApiError> {
        Ok(self.status(false).await?.viewable)
    }

    /// Returns the conversion error, if one occurred.
    pub async fn error(&mut self) -> Result<Option<String>, ApiError> {
        Ok(self.status(false).await?.error)
    }

    /// Returns true if conversion finished successfully.
    pub async fn is_converted(&mut self) -> Result<bool, ApiError> {
        Ok(self.status(false).await?.is_converted())
    }

    // ------------------------------------------------------------------------
    // Remote operations
    // ------------------------------------------------------------------------

    /// Deletes the document; returns whether the service confirmed it.
    ///
    /// The handle stays usable locally, but further requests will fail.
    #[instrument(skip(self), fields(uuid = %self.id))]
    pub async fn delete(&self) -> Result<bool, ApiError> {
        let request = ApiRequest::post(api::DELETE_ENDPOINT).param("uuid", &self.id);
        let deleted = match self.client.execute(request).await? {
            ResponseBody::Json(Value::Bool(flag)) => flag,
            ResponseBody::Json(Value::String(text)) => is_true(&text),
            ResponseBody::Json(_) => false,
            raw @ ResponseBody::Raw(_) => is_true(&raw.into_text()),
        };
        info!(deleted, "Delete requested");
        Ok(deleted)
    }

    /// Downloads a PNG thumbnail no larger than `max_width` x `max_height`.
    ///
    /// Both edges must be between 1 and 300 pixels.
    #[instrument(skip(self, dest), fields(uuid = %self.id))]
    pub async fn download_thumbnail(
        &self,
        dest: impl AsRef<Path>,
        max_width: u32,
        max_height: u32,
    ) -> Result<(), ApiError> {
        for (edge, value) in [("width", max_width), ("height", max_height)] {
            if value == 0 || value > MAX_THUMBNAIL_SIZE {
                return Err(CoreError::InvalidArgument(format!(
                    "thumbnail {edge} must be between 1 and {MAX_THUMBNAIL_SIZE}, got {value}"
                ))
                .into());
            }
        }

        let request = ApiRequest::get(api::DOWNLOAD_THUMBNAIL_ENDPOINT)
            .param("uuid", &self.id)
            .param("size", format!("{max_width}x{max_height}"));
        self.download_to(request, dest.as_ref()).await
    }

    /// Downloads the original file, without annotations.
    #[instrument(skip(self, dest), fields(uuid = %self.id))]
    pub async fn download_original(&self, dest: impl AsRef<Path>) -> Result<(), ApiError> {
        let request = ApiRequest::get(api::DOWNLOAD_DOCUMENT_ENDPOINT)
            .param("uuid", &self.id)
            .param("pdf", false)
            .param("annotated", false);
        self.download_to(request, dest.as_ref()).await
    }

    /// Downloads a PDF rendition, embedding the annotations `annotations` selects.
    #[instrument(skip(self, dest), fields(uuid = %self.id))]
    pub async fn download_pdf(
        &self,
        dest: impl AsRef<Path>,
        annotations: &AnnotationFilter,
    ) -> Result<(), ApiError> {
        let annotated = annotations.is_visible();
        let mut request = ApiRequest::get(api::DOWNLOAD_DOCUMENT_ENDPOINT)
            .param("uuid", &self.id)
            .param("pdf", true)
            .param("annotated", annotated);
        if annotated {
            request = request.param("filter", annotations.api_value());
        }
        self.download_to(request, dest.as_ref()).await
    }

    /// Returns the extracted text, one entry per page.
    #[instrument(skip(self), fields(uuid = %self.id))]
    pub async fn extracted_text(&self) -> Result<Vec<String>, ApiError> {
        let request = ApiRequest::get(api::DOWNLOAD_TEXT_ENDPOINT).param("uuid", &self.id);
        let text = self.client.execute(request).await?.into_text();
        Ok(split_pages(&text))
    }

    async fn download_to(&self, request: ApiRequest, dest: &Path) -> Result<(), ApiError> {
        let bytes = self.client.execute(request).await?.into_bytes();
        tokio::fs::write(dest, &bytes).await?;
        debug!(dest = %dest.display(), bytes = bytes.len(), "Download written");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------------

    /// Creates an unactivated viewing session with the given options.
    pub fn create_viewing_session(&self, options: SessionOptions) -> ViewingSession {
        ViewingSession::new(self, options)
    }

    /// Creates an unactivated viewing session with default options.
    pub fn viewing_session(&self) -> ViewingSession {
        self.create_viewing_session(SessionOptions::default())
    }

    /// Returns the viewer URL for an activated session.
    pub fn viewing_url(&self, session: &ViewingSession) -> Result<String, CoreError> {
        session.viewing_url()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Document {}

fn is_true(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

/// Splits text on form feeds, dropping empty trailing pages.
fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_SEPARATOR).map(str::to_string).collect();
    while pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

// ============================================================================
// Tests
// ============================================================================
