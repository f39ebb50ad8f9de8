//! Events published by executors onto a task's event queue

use serde::{Deserialize, Serialize};

use super::{message::Message, task::TaskStatus};

/// An item produced by an executor for the request handler to consume
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Event {
    /// An agent-authored message
    Message(Message),

    /// A change of task status reported by the executor
    StatusUpdate(TaskStatusUpdate),
}

impl Event {
    /// The message carried by this event, if any
    pub fn message(&self) -> Option<&Message> {
        match self {
            Event::Message(message) => Some(message),
            Event::StatusUpdate(update) => update.message.as_ref(),
        }
    }
}

impl From<Message> for Event {
    fn from(message: Message) -> Self {
        Event::Message(message)
    }
}

impl From<TaskStatusUpdate> for Event {
    fn from(update: TaskStatusUpdate) -> Self {
        Event::StatusUpdate(update)
    }
}

/// Status update event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdate {
    pub task_id: String,

    pub status: TaskStatus,

    /// Set on the last status update the executor will publish
    #[serde(rename = "final", default)]
    pub is_final: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatusUpdate {
    pub fn new(task_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            is_final: status.is_terminal(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }
}
