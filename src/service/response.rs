//! A2A service response types

use serde::Serialize;

use crate::{
    codec::jsonrpc::JSONRPC_VERSION,
    protocol::{
        message::Message,
        operation::SendMessageResult,
        task::Task,
    },
};

/// Response from an A2A service operation
#[derive(Debug, Clone)]
pub enum A2AResponse {
    /// Agent message (from SendMessage)
    Message(Box<Message>),

    /// Task response (from SendMessage, GetTask, CancelTask)
    Task(Box<Task>),

    /// Empty response
    Empty,
}

impl A2AResponse {
    /// Extract a task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self {
            A2AResponse::Task(task) => Some(*task),
            _ => None,
        }
    }

    /// Convert the response into a `message/send` result, if it is one
    pub fn into_send_result(self) -> Option<SendMessageResult> {
        match self {
            A2AResponse::Message(message) => Some(SendMessageResult::Message(*message)),
            A2AResponse::Task(task) => Some(SendMessageResult::Task(*task)),
            A2AResponse::Empty => None,
        }
    }

    /// Check if the response is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, A2AResponse::Empty)
    }
}

/// The correlated response envelope of a `message/send` call
///
/// Serializes to the same shape the agent sent on the wire, which is what
/// dot-path extraction (`result.parts.0.text`) runs against.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub jsonrpc: &'static str,
    pub id: String,
    pub result: SendMessageResult,
}

impl SendMessageResponse {
    pub fn new(id: impl Into<String>, result: SendMessageResult) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: id.into(),
            result,
        }
    }
}
