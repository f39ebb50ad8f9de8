//! Transport abstraction layer for A2A protocol

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::{
    collections::HashMap,
    task::{Context, Poll},
    time::Duration,
};

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::protocol::error::A2AError;

/// Protocol-agnostic transport request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The endpoint path relative to the base URL (empty for the base URL itself)
    pub endpoint: String,

    /// HTTP method or equivalent operation (e.g., "POST", "GET")
    pub method: String,

    /// Headers or metadata for the request
    pub headers: HashMap<String, String>,

    /// Request body as bytes
    pub body: Bytes,

    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Create a new transport request
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
            timeout: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Protocol-agnostic transport response
#[derive(Debug)]
pub struct TransportResponse {
    /// Status code (e.g., HTTP status code)
    pub status: u16,

    /// Response headers or metadata
    pub headers: HashMap<String, String>,

    /// Response body as bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Set the response body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Resolve an endpoint path against a base URL
///
/// Slashes at the seam are normalised, so `http://h/` + `/x` and `http://h` + `x`
/// both give `http://h/x`. An empty endpoint yields the base URL unchanged.
pub fn endpoint_url(base_url: &Url, endpoint: &str) -> String {
    if endpoint.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.as_str().trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Core transport trait for executing protocol-agnostic requests
///
/// The client side of the protocol (card resolution and JSON-RPC calls) only
/// talks to the network through this trait.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Check if the transport is ready to accept requests
    ///
    /// This is used by Tower's Service trait to implement backpressure
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>>;

    /// Execute a transport request asynchronously
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError>;

    /// Get the base URL requests are resolved against
    fn base_url(&self) -> &Url;

    /// A transport of the same kind pointed at another base URL
    ///
    /// Used once the agent card names the endpoint that accepts messages.
    fn with_base_url(&self, base_url: Url) -> Self;
}
