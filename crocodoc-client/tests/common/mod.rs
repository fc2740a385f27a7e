//! In-memory transport for exercising the client without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crocodoc_client::{
    ApiError, ApiRequest, CrocodocClient, HttpMethod, RawResponse, Transport,
};
use serde_json::Value;

pub const TOKEN: &str = "123456";
pub const STUB_UUID: &str = "8e5b0721-26c4-11df-b354-002170de47d3";
pub const STUB_SESSION_KEY: &str =
    "CFAmd3Qjm_2ehBI7HyndnXKsDrQXJ7jHCuzcRv_V4FAgbSmaBkF";

type Handler = Box<dyn Fn(&ApiRequest) -> RawResponse + Send + Sync>;

/// Answers requests from registered routes and records everything sent.
///
/// Unregistered routes answer 404.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(HttpMethod, String), Handler>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl std::fmt::Debug for StubTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubTransport").finish_non_exhaustive()
    }
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a handler for a method and path.
    pub fn route(
        &self,
        method: HttpMethod,
        path: &str,
        handler: impl Fn(&ApiRequest) -> RawResponse + Send + Sync + 'static,
    ) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Box::new(handler));
    }

    /// Registers a fixed reply.
    pub fn reply(&self, method: HttpMethod, path: &str, response: RawResponse) {
        self.route(method, path, move |_| response.clone());
    }

    /// Returns every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the requests sent to `path`.
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let response = {
            let routes = self.routes.lock().unwrap();
            match routes.get(&(request.method, request.path.clone())) {
                Some(handler) => handler(&request),
                None => RawResponse::new(404, Some("text/plain"), "not found"),
            }
        };
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

pub fn json(value: Value) -> RawResponse {
    RawResponse::new(200, Some("application/json"), value.to_string())
}

pub fn raw(content_type: &str, body: impl Into<bytes::Bytes>) -> RawResponse {
    RawResponse::new(200, Some(content_type), body)
}

pub fn status(code: u16, body: &str) -> RawResponse {
    RawResponse::new(code, Some("text/plain"), body.to_string())
}

/// Builds a client over `stub` with the given status refresh threshold.
pub fn client_with_threshold(stub: &Arc<StubTransport>, threshold: Duration) -> CrocodocClient {
    CrocodocClient::builder()
        .api_token(TOKEN)
        .status_refresh_threshold(threshold)
        .transport(Arc::clone(stub) as Arc<dyn Transport>)
        .build()
        .unwrap()
}

/// Builds a client over `stub` with the default threshold.
pub fn client(stub: &Arc<StubTransport>) -> CrocodocClient {
    client_with_threshold(stub, Duration::from_secs(4))
}
