//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower_service::Service;

use crate::{
    codec::{Codec, JsonRpcResponse},
    protocol::{error::A2AError, operation::A2AOperation},
    service::{A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Core A2A protocol service that wraps a transport
///
/// Every operation is a single JSON-RPC POST to the transport's base URL, which
/// is the `url` advertised by the agent card.
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self { transport, codec }
    }

    /// Build a transport request from an A2A request
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        let mut transport_req = TransportRequest::new("", "POST")
            .header("Content-Type", codec.content_type())
            .header("Accept", codec.content_type())
            .timeout(req.context.timeout);

        for (key, value) in &req.context.metadata {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        let body = codec.encode_request(&req.id, &req.operation)?;
        Ok(transport_req.body(body))
    }

    /// Parse a transport response into an A2A response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        request_id: &str,
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if !transport_resp.is_success() {
            return Err(Self::handle_error_response(&transport_resp));
        }

        codec.decode_response(&transport_resp.body, request_id, operation)
    }

    /// Handle error responses from the transport
    fn handle_error_response(transport_resp: &TransportResponse) -> A2AError {
        // Agents may still send a JSON-RPC error object alongside an HTTP error status
        if let Ok(envelope) = serde_json::from_slice::<JsonRpcResponse>(&transport_resp.body) {
            if let Some(error) = envelope.error {
                return error.into();
            }
        }

        A2AError::Transport(format!("HTTP error: {}", transport_resp.status))
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();

        Box::pin(async move {
            let transport_req = Self::build_transport_request(&req, codec.as_ref())?;

            tracing::debug!(
                request_id = %req.id,
                method = req.operation.method(),
                "dispatching A2A request"
            );
            let transport_resp = transport.execute(transport_req).await?;

            Self::parse_transport_response(transport_resp, codec.as_ref(), &req.id, &req.operation)
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
        }
    }
}
