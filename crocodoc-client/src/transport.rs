//! Transport abstraction.
//!
//! A [`Transport`] executes one [`ApiRequest`] and hands back the raw status,
//! content type and body. It does not interpret status codes; that is done
//! uniformly by [`crate::classify`]. The default implementation is
//! [`crate::HttpTransport`]; tests plug in stubs.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ApiError;

// ============================================================================
// Request
// ============================================================================

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns true if parameters travel in the query string for this method.
    pub fn uses_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file sent as a multipart part.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the service.
    pub file_name: String,
    /// MIME type.
    pub mime: String,
    /// File contents.
    pub contents: Bytes,
}

/// One API call, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path below the base URL, e.g. `document/status`.
    pub path: String,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// Form body parameters.
    pub form: Vec<(String, String)>,
    /// File to upload; turns the body into multipart.
    pub file: Option<FilePart>,
}

impl ApiRequest {
    /// Creates a request with no parameters.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
            file: None,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a parameter: to the query string for GET/DELETE, to the body otherwise.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let pair = (key.into(), value.to_string());
        if self.method.uses_query() {
            self.query.push(pair);
        } else {
            self.form.push(pair);
        }
        self
    }

    /// Attaches a file to upload.
    pub fn file(mut self, part: FilePart) -> Self {
        self.file = Some(part);
        self
    }

    /// Adds the API token, following the same placement rule as [`Self::param`].
    pub fn with_token(self, token: &str) -> Self {
        self.param("token", token)
    }

    /// Looks up a query string parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }

    /// Looks up a form body parameter.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }

    /// Looks up a parameter wherever it was placed.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.query_value(key).or_else(|| self.form_value(key))
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// ============================================================================
// Response
// ============================================================================

/// Unclassified response from a transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Creates a response.
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Returns true if the content type denotes JSON.
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|value| {
            value
                .split(';')
                .next()
                .is_some_and(|essence| essence.trim().to_ascii_lowercase().ends_with("json"))
        })
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Executes API requests.
///
/// Implementations must not retry and must not map status codes to errors;
/// only failures to obtain a response at all are errors here.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends the request and returns the raw response.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_goes_to_query_for_get_and_delete() {
        let get = ApiRequest::get("document/status").with_token("123456");
        assert_eq!(get.query_value("token"), Some("123456"));
        assert!(get.form.is_empty());

        let delete = ApiRequest::delete("document").with_token("123456");
        assert_eq!(delete.query_value("token"), Some("123456"));
    }

    #[test]
    fn test_token_goes_to_body_for_post() {
        let post = ApiRequest::post("document/delete")
            .param("uuid", "abc")
            .with_token("123456");
        assert_eq!(post.form_value("token"), Some("123456"));
        assert_eq!(post.form_value("uuid"), Some("abc"));
        assert!(post.query.is_empty());
    }

    #[test]
    fn test_param_value_searches_both() {
        let get = ApiRequest::get("download/text").param("uuid", "abc");
        assert_eq!(get.param_value("uuid"), Some("abc"));
        assert_eq!(get.param_value("missing"), None);
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(RawResponse::new(200, Some("application/json"), "{}").is_json());
        assert!(RawResponse::new(200, Some("application/json; charset=utf-8"), "{}").is_json());
        assert!(RawResponse::new(200, Some("application/vnd.api+json"), "{}").is_json());
        assert!(!RawResponse::new(200, Some("text/plain"), "x").is_json());
        assert!(!RawResponse::new(200, None, "x").is_json());
    }
}
