//! A2A task types and lifecycle management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{error::TaskError, event::Event, message::Message};

/// A task in the A2A protocol
///
/// Tasks are the server-side record of one request's execution lifecycle.
/// They move from submitted through working to a terminal state and keep
/// every event the executor published, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Optional context ID for grouping related tasks/messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    /// Input message that created this task
    pub input: Message,

    /// Events emitted by the executor, in publication order
    #[serde(default)]
    pub history: Vec<Event>,

    /// Error information (present if task failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskError>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new task in the submitted state
    pub fn new(id: impl Into<String>, input: Message) -> Self {
        Self {
            id: id.into(),
            context_id: input.context_id.clone(),
            status: TaskStatus::Submitted,
            input,
            history: Vec::new(),
            error: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move the task to a new status
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.touch();
    }

    /// Append an event to the task history
    pub fn record(&mut self, event: Event) {
        self.history.push(event);
        self.touch();
    }

    /// Mark the task as failed with the given error
    pub fn fail(&mut self, error: TaskError) {
        self.error = Some(error);
        self.set_status(TaskStatus::Failed);
    }

    /// Messages recorded in the history, in order
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.history.iter().filter_map(Event::message)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// Task status in the A2A protocol lifecycle
///
/// Task lifecycle: submitted → working → completed/failed/canceled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has been received and is bound to the store
    Submitted,

    /// Task is currently being processed
    Working,

    /// Task completed successfully
    Completed,

    /// Task was canceled by the client
    Canceled,

    /// Task failed with an error
    Failed,
}

impl TaskStatus {
    /// Check if this is a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Canceled
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::{event::TaskStatusUpdate, message::Message};

    use super::*;

    #[test]
    fn test_task_creation() {
        let msg = Message::user("Test");
        let task = Task::new("task-123", msg);

        assert_eq!(task.id, "task-123");
        assert_eq!(task.status, TaskStatus::Submitted);
        assert!(!task.is_terminal());
        assert!(task.history.is_empty());
        assert!(task.updated_at.is_none());
    }

    #[test]
    fn test_task_lifecycle() {
        let mut task = Task::new("task-123", Message::user("Test"));

        task.set_status(TaskStatus::Working);
        assert!(!task.is_terminal());
        assert!(task.updated_at.is_some());

        task.record(Event::from(Message::agent("done")));
        task.record(Event::from(TaskStatusUpdate::new(
            "task-123",
            TaskStatus::Working,
        )));
        task.set_status(TaskStatus::Completed);

        assert!(task.is_terminal());
        assert_eq!(task.messages().count(), 1);
    }

    #[test]
    fn test_task_failure() {
        let mut task = Task::new("task-1", Message::user("Test"));
        task.fail(TaskError::new("EXECUTION_FAILED", "boom"));

        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.as_ref().map(|e| e.message.as_str()), Some("boom"));
    }

    #[test]
    fn test_task_status() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Canceled.is_terminal());
        assert!(!TaskStatus::Working.is_terminal());
        assert!(!TaskStatus::Submitted.is_terminal());
    }

    #[test]
    fn test_task_serialization() {
        let task = Task::new("task-123", Message::user("Test"));

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "task-123");
        assert_eq!(json["status"], "submitted");
        assert!(json.get("createdAt").is_some());

        let deserialized: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task, deserialized);
    }
}
