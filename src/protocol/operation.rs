//! A2A protocol operations and their parameter/result envelopes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{message::Message, task::Task};

/// A2A protocol operations
///
/// Each operation maps onto one JSON-RPC method of the A2A binding.
#[derive(Debug, Clone)]
pub enum A2AOperation {
    /// Send a message to an agent
    SendMessage {
        /// The message to send
        message: Message,
    },

    /// Get a task by ID
    GetTask {
        /// The task ID to retrieve
        task_id: String,
    },

    /// Cancel a task
    CancelTask {
        /// The task ID to cancel
        task_id: String,
    },
}

impl A2AOperation {
    pub const SEND_MESSAGE: &'static str = "message/send";
    pub const GET_TASK: &'static str = "tasks/get";
    pub const CANCEL_TASK: &'static str = "tasks/cancel";

    /// Get the JSON-RPC method name for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendMessage { .. } => Self::SEND_MESSAGE,
            A2AOperation::GetTask { .. } => Self::GET_TASK,
            A2AOperation::CancelTask { .. } => Self::CANCEL_TASK,
        }
    }

    /// Build the JSON-RPC params object for this operation
    pub fn params(&self) -> Result<Value, serde_json::Error> {
        match self {
            A2AOperation::SendMessage { message } => {
                serde_json::to_value(MessageSendParams::new(message.clone()))
            }
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                serde_json::to_value(TaskIdParams {
                    id: task_id.clone(),
                })
            }
        }
    }
}

/// Params of `message/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageSendParams {
    pub message: Message,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl MessageSendParams {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            metadata: None,
        }
    }
}

/// Params of `tasks/get` and `tasks/cancel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskIdParams {
    pub id: String,
}

/// Result of `message/send`: the agent's reply or the task it produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SendMessageResult {
    Message(Message),
    Task(Task),
}

impl SendMessageResult {
    /// The agent message, if the result is one
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            SendMessageResult::Message(message) => Some(message),
            SendMessageResult::Task(_) => None,
        }
    }
}
