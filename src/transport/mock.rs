use std::{
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use url::Url;

use crate::{
    protocol::error::A2AError,
    transport::{Transport, TransportRequest, TransportResponse},
};

type Handler = dyn Fn(&Url, TransportRequest) -> Result<TransportResponse, A2AError> + Send + Sync;

/// Mock transport for internal testing
///
/// Responses come from a closure; every request is recorded together with the
/// base URL it was sent against.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: Arc<Handler>,
    base_url: Url,
    requests: Arc<Mutex<Vec<(Url, TransportRequest)>>>,
}

impl MockTransport {
    /// Create a new mock transport with a custom request handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Self::fallible(move |_, req| Ok(handler(req)))
    }

    /// Create a mock transport whose handler may fail at the transport level
    pub fn fallible<F>(handler: F) -> Self
    where
        F: Fn(&Url, TransportRequest) -> Result<TransportResponse, A2AError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            handler: Arc::new(handler),
            base_url: Url::parse("http://mock.local/").unwrap(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock transport that always returns 200 OK
    pub fn ok() -> Self {
        Self::new(|_| TransportResponse::new(200))
    }

    /// Answer every JSON-RPC request with `result`, echoing the request id
    pub fn rpc_result(result: Value) -> Self {
        Self::new(move |req| {
            let request: Value = serde_json::from_slice(&req.body).unwrap();
            let body = json!({"jsonrpc": "2.0", "id": request["id"], "result": result});
            TransportResponse::new(200).body(Bytes::from(serde_json::to_vec(&body).unwrap()))
        })
    }

    /// Requests seen so far, with the base URL each was sent to
    pub fn requests(&self) -> Vec<(Url, TransportRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        self.requests
            .lock()
            .unwrap()
            .push((self.base_url.clone(), request.clone()));
        (self.handler)(&self.base_url, request)
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn with_base_url(&self, base_url: Url) -> Self {
        Self {
            handler: self.handler.clone(),
            base_url,
            requests: self.requests.clone(),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}
