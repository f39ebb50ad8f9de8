//! JSON-RPC 2.0 codec for A2A protocol
//!
//! The envelope types are shared by the client codec and the server dispatcher.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    codec::Codec,
    protocol::{
        error::A2AError,
        operation::{A2AOperation, SendMessageResult},
        task::Task,
    },
    service::response::A2AResponse,
};

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&A2AError> for JsonRpcError {
    fn from(err: &A2AError) -> Self {
        Self {
            code: err.rpc_code(),
            message: err.to_string(),
            data: err.rpc_data(),
        }
    }
}

impl From<JsonRpcError> for A2AError {
    fn from(err: JsonRpcError) -> Self {
        A2AError::from_rpc(err.code, err.message, err.data.as_ref())
    }
}

/// JSON-RPC 2.0 codec that wraps A2A operations
///
/// Requests carry the caller's request id; responses whose id does not match
/// are rejected as uncorrelated.
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, request_id: &str, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let request = JsonRpcRequest::new(request_id, operation.method(), operation.params()?);
        let bytes = serde_json::to_vec(&request)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        request_id: &str,
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if body.is_empty() {
            return Ok(A2AResponse::Empty);
        }

        let response: JsonRpcResponse = serde_json::from_slice(body)
            .map_err(|e| A2AError::Protocol(format!("Failed to parse JSON-RPC response: {}", e)))?;

        if response.id.as_str() != Some(request_id) {
            return Err(A2AError::Protocol(format!(
                "Response id {} does not match request id {}",
                response.id, request_id
            )));
        }

        if let Some(error) = response.error {
            return Err(error.into());
        }

        let result = response.result.ok_or_else(|| {
            A2AError::Protocol("JSON-RPC response missing 'result' field".to_string())
        })?;

        match operation {
            A2AOperation::SendMessage { .. } => match serde_json::from_value(result)? {
                SendMessageResult::Message(message) => Ok(A2AResponse::Message(Box::new(message))),
                SendMessageResult::Task(task) => Ok(A2AResponse::Task(Box::new(task))),
            },
            A2AOperation::GetTask { .. } | A2AOperation::CancelTask { .. } => {
                let task: Task = serde_json::from_value(result)?;
                Ok(A2AResponse::Task(Box::new(task)))
            }
        }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
