//! reqwest-backed transport.
//!
//! Adds to the raw reqwest client:
//! - Base URL resolution for API paths
//! - Optional extra CA bundle
//! - Multipart encoding when a file is attached
//! - Request/response tracing (info level in debug mode)

use async_trait::async_trait;
use reqwest::{header, multipart, Certificate, Client, RequestBuilder};
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{ApiRequest, HttpMethod, RawResponse, Transport};

/// User agent string.
const USER_AGENT: &str = concat!("crocodoc-rs/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Transport
// ============================================================================

/// Default [`Transport`] talking to the service over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
    base_url: String,
    debug: bool,
}

impl HttpTransport {
    /// Builds a transport from the endpoint, TLS and timeout settings.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT);

        if let Some(path) = &config.ca_bundle {
            let pem = std::fs::read(path)?;
            builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
            debug!(path = %path.display(), "Added CA bundle");
        }

        Ok(Self {
            inner: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            debug: config.debug,
        })
    }

    /// Returns the absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build(&self, request: ApiRequest) -> Result<RequestBuilder, ApiError> {
        let url = self.url_for(&request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.inner.get(&url),
            HttpMethod::Post => self.inner.post(&url),
            HttpMethod::Delete => self.inner.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(file) = request.file {
            let mut form = multipart::Form::new();
            for (key, value) in request.form {
                form = form.text(key, value);
            }
            let part = multipart::Part::bytes(file.contents.to_vec())
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            builder = builder.multipart(form.part(file.field, part));
        } else if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        if self.debug {
            info!("Sending request");
        } else {
            debug!("Sending request");
        }

        let response = self.build(request)?.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        if self.debug {
            info!(status, content_type = ?content_type, bytes = body.len(), "Response received");
        } else {
            debug!(status, bytes = body.len(), "Response received");
        }

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
