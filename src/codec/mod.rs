//! Serialization codecs for protocol bindings

pub mod jsonrpc;

pub use jsonrpc::{JsonRpcCodec, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

use crate::{
    protocol::{error::A2AError, operation::A2AOperation},
    service::response::A2AResponse,
};
use bytes::Bytes;

/// Codec trait for encoding and decoding A2A protocol messages
pub trait Codec: Send + Sync {
    /// Serialize an A2A operation to bytes for transport
    ///
    /// # Arguments
    ///
    /// * `request_id` - Correlation id the response must echo
    /// * `operation` - The A2A operation to encode
    fn encode_request(&self, request_id: &str, operation: &A2AOperation) -> Result<Bytes, A2AError>;

    /// Deserialize transport response bytes to an A2A response
    ///
    /// # Arguments
    ///
    /// * `body` - The response body bytes
    /// * `request_id` - The id the request was sent with
    /// * `operation` - The original operation (for context)
    fn decode_response(
        &self,
        body: &[u8],
        request_id: &str,
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
