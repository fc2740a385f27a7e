//! The Crocodoc client and its builder.
//!
//! A [`CrocodocClient`] bundles a validated [`ClientConfig`] with the
//! [`Transport`] built from it. The client is cheap to clone; documents and
//! sessions keep a clone so they can issue requests on their own.
//!
//! Configuration is never changed in place: [`CrocodocClient::reconfigure`]
//! returns a new client with a freshly built transport.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use crocodoc_core::CoreError;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::api::{self, StatusRecord, UploadResponse};
use crate::collection::DocumentSet;
use crate::config::ClientConfig;
use crate::document::Document;
use crate::error::ApiError;
use crate::http::HttpTransport;
use crate::response::{classify, ResponseBody};
use crate::transport::{ApiRequest, FilePart, Transport};

// ============================================================================
// Client
// ============================================================================

/// Entry point for all API operations.
#[derive(Clone)]
pub struct CrocodocClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    token: String,
    refresh_threshold: chrono::Duration,
    transport: Arc<dyn Transport>,
    /// Set when the caller supplied the transport; survives reconfiguration.
    custom_transport: bool,
}

impl CrocodocClient {
    /// Creates a client from a configuration, using the HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        ClientBuilder::from_config(config).build()
    }

    /// Creates a builder for customizing the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns how long a fetched document status is trusted.
    pub fn status_refresh_threshold(&self) -> chrono::Duration {
        self.inner.refresh_threshold
    }

    /// Returns a new client for `config`.
    ///
    /// The HTTP transport is rebuilt from the new settings. A caller-supplied
    /// transport is carried over unchanged.
    pub fn reconfigure(&self, config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = ClientBuilder::from_config(config);
        if self.inner.custom_transport {
            builder = builder.transport(Arc::clone(&self.inner.transport));
        }
        builder.build()
    }

    /// Sends a request with the API token attached and classifies the reply.
    pub async fn execute(&self, request: ApiRequest) -> Result<ResponseBody, ApiError> {
        let request = request.with_token(&self.inner.token);
        let response = self.inner.transport.send(request).await?;
        classify(response)
    }

    /// Wraps a known document id.
    pub fn document(&self, id: impl Into<String>) -> Result<Document, ApiError> {
        Document::new(self.clone(), id)
    }

    /// Creates an empty document set bound to this client.
    pub fn document_set(&self) -> DocumentSet {
        DocumentSet::new(self)
    }

    /// Uploads a local file and returns the new document.
    ///
    /// Fails with [`ApiError::FileNotFound`] before any request if `path`
    /// does not exist.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<Document, ApiError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ApiError::FileNotFound(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::FileNotFound(PathBuf::from(path)))?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let contents = Bytes::from(tokio::fs::read(path).await?);
        debug!(file_name = %file_name, mime = %mime, bytes = contents.len(), "Uploading file");

        let request = ApiRequest::post(api::UPLOAD_ENDPOINT).file(FilePart {
            field: "file".to_string(),
            file_name,
            mime: mime.essence_str().to_string(),
            contents,
        });
        self.finish_upload(request).await
    }

    /// Asks the service to fetch and convert the document at `url`.
    #[instrument(skip(self))]
    pub async fn upload_url(&self, url: &str) -> Result<Document, ApiError> {
        Url::parse(url).map_err(|e| {
            CoreError::InvalidArgument(format!("'{url}' is not a valid URL: {e}"))
        })?;

        let request = ApiRequest::post(api::UPLOAD_ENDPOINT).param("url", url);
        self.finish_upload(request).await
    }

    async fn finish_upload(&self, request: ApiRequest) -> Result<Document, ApiError> {
        let reply: UploadResponse = self.execute(request).await?.json()?;
        let uuid = reply.into_uuid().inspect_err(|e| {
            warn!(error = %e, "Upload refused");
        })?;

        info!(uuid = %uuid, "Document uploaded");
        self.document(uuid)
    }

    /// Fetches the status records of the given documents in one request.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn fetch_statuses<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<StatusRecord>, ApiError> {
        let joined = ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let request = ApiRequest::get(api::STATUS_ENDPOINT).param("uuids", joined);

        let body = self.execute(request).await?;
        let value = match body {
            ResponseBody::Json(value) => value,
            raw @ ResponseBody::Raw(_) => raw.json()?,
        };
        let records = api::parse_status_reply(value)?;
        debug!(received = records.len(), "Status records received");
        Ok(records)
    }

    /// Returns the viewer URL for a session key.
    pub fn viewing_url(&self, key: &str) -> String {
        format!(
            "{}/view/{}",
            self.inner.config.view_base_url.trim_end_matches('/'),
            key
        )
    }
}

impl std::fmt::Debug for CrocodocClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrocodocClient")
            .field("config", &self.inner.config)
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Client Builder
// ============================================================================

/// Builder for constructing a [`CrocodocClient`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a builder with default settings and no token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder starting from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Sets the API token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = Some(token.into());
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Sets the host used for viewing URLs.
    pub fn view_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.view_base_url = url.into();
        self
    }

    /// Sets an extra CA bundle. Existence is checked by [`Self::build`].
    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ca_bundle = Some(path.into());
        self
    }

    /// Sets how long a fetched document status is trusted.
    pub fn status_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.config.status_refresh_threshold = threshold;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enables request/response logging at info level.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Replaces the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validates the configuration and builds the client.
    pub fn build(self) -> Result<CrocodocClient, ApiError> {
        self.config.validate()?;
        let token = self.config.api_token()?.to_string();
        let refresh_threshold = self.config.refresh_threshold()?;

        let custom_transport = self.transport.is_some();
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };

        debug!(config = ?self.config, custom_transport, "Built client");
        Ok(CrocodocClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                token,
                refresh_threshold,
                transport,
                custom_transport,
            }),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
