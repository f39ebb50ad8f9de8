//! Per-request context handed to an agent executor

use std::collections::HashMap;

use serde_json::Value;

use crate::protocol::Message;

/// Read-only view of one inbound request
///
/// Executors receive this by reference and never mutate it; everything they
/// want to say goes through the event queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub message: Message,
    pub task_id: String,
    pub context_id: String,
    pub metadata: HashMap<String, Value>,
}

impl RequestContext {
    /// Bind `message` to a task; the message's metadata becomes the request metadata
    pub fn new(message: Message, task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        let metadata = message.metadata.clone().unwrap_or_default();
        Self {
            message,
            task_id: task_id.into(),
            context_id: context_id.into(),
            metadata,
        }
    }

    /// Add a request metadata field
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Concatenated text of the user's message
    pub fn user_input(&self) -> String {
        self.message.text()
    }
}
