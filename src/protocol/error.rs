//! Error types for A2A protocol operations

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::task::TaskStatus;

/// JSON-RPC 2.0 and A2A error codes
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const TASK_NOT_FOUND: i64 = -32001;
    pub const TASK_NOT_CANCELABLE: i64 = -32002;
    pub const UNSUPPORTED_OPERATION: i64 = -32004;
}

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// The agent card could not be fetched (network error or non-success status)
    #[error("Agent card unavailable at {url}: {reason}")]
    CardUnavailable { url: String, reason: String },

    /// The agent card was fetched but violates the card schema
    #[error("Agent card malformed: {0}")]
    CardMalformed(String),

    /// A task with this id already exists in the store
    #[error("Task already exists: {task_id}")]
    DuplicateTask { task_id: String },

    /// The executor could not complete its work
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The executor does not support the requested operation
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Task not found error
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// The task is in a terminal state and cannot be canceled
    #[error("Task {task_id} cannot be canceled in state {status:?}")]
    TaskNotCancelable { task_id: String, status: TaskStatus },

    /// The event queue was closed before the event could be enqueued
    #[error("Event queue is closed")]
    QueueClosed,

    /// Transport-level error (network, connection, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol-level error (invalid envelope, uncorrelated response, etc.)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Validation error (invalid request or response)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,

    /// A JSON-RPC error returned by the remote agent without a dedicated variant
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },
}

/// Task-specific error recorded on a failed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct TaskError {
    /// Error code (e.g., "EXECUTION_FAILED")
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

impl TaskError {
    /// Create a new task error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&A2AError> for TaskError {
    fn from(err: &A2AError) -> Self {
        let code = match err {
            A2AError::ExecutionFailed(_) => "EXECUTION_FAILED",
            A2AError::UnsupportedOperation(_) => "UNSUPPORTED_OPERATION",
            A2AError::QueueClosed => "QUEUE_CLOSED",
            _ => "INTERNAL_ERROR",
        };
        TaskError::new(code, err.to_string())
    }
}

impl A2AError {
    /// The JSON-RPC error code this error is reported with
    pub fn rpc_code(&self) -> i64 {
        match self {
            A2AError::TaskNotFound { .. } => codes::TASK_NOT_FOUND,
            A2AError::TaskNotCancelable { .. } => codes::TASK_NOT_CANCELABLE,
            A2AError::UnsupportedOperation(_) => codes::UNSUPPORTED_OPERATION,
            A2AError::DuplicateTask { .. } => codes::INVALID_REQUEST,
            A2AError::Validation(_) => codes::INVALID_PARAMS,
            A2AError::Serialization(_) => codes::PARSE_ERROR,
            A2AError::JsonRpc { code, .. } => *code,
            _ => codes::INTERNAL_ERROR,
        }
    }

    /// Structured data attached to the JSON-RPC error object
    pub fn rpc_data(&self) -> Option<Value> {
        match self {
            A2AError::TaskNotFound { task_id }
            | A2AError::DuplicateTask { task_id }
            | A2AError::TaskNotCancelable { task_id, .. } => Some(json!({ "taskId": task_id })),
            A2AError::UnsupportedOperation(operation) => Some(json!({ "operation": operation })),
            _ => None,
        }
    }

    /// Rebuild an error from a JSON-RPC error object received over the wire
    pub fn from_rpc(code: i64, message: String, data: Option<&Value>) -> Self {
        let field = |name: &str| {
            data.and_then(|d| d.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        match code {
            codes::TASK_NOT_FOUND => A2AError::TaskNotFound {
                task_id: field("taskId").unwrap_or_default(),
            },
            codes::UNSUPPORTED_OPERATION => {
                A2AError::UnsupportedOperation(field("operation").unwrap_or(message))
            }
            codes::INTERNAL_ERROR => A2AError::ExecutionFailed(message),
            _ => A2AError::JsonRpc { code, message },
        }
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_codes() {
        let err = A2AError::TaskNotFound {
            task_id: "task-1".into(),
        };
        assert_eq!(err.rpc_code(), codes::TASK_NOT_FOUND);
        assert_eq!(err.rpc_data(), Some(json!({"taskId": "task-1"})));

        let err = A2AError::UnsupportedOperation("cancel".into());
        assert_eq!(err.rpc_code(), codes::UNSUPPORTED_OPERATION);

        let err = A2AError::ExecutionFailed("boom".into());
        assert_eq!(err.rpc_code(), codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_from_rpc_restores_variants() {
        let data = json!({"taskId": "task-9"});
        let err = A2AError::from_rpc(codes::TASK_NOT_FOUND, "missing".into(), Some(&data));
        assert!(matches!(err, A2AError::TaskNotFound { task_id } if task_id == "task-9"));

        let data = json!({"operation": "cancel"});
        let err =
            A2AError::from_rpc(codes::UNSUPPORTED_OPERATION, "nope".into(), Some(&data));
        assert!(matches!(err, A2AError::UnsupportedOperation(op) if op == "cancel"));

        let err = A2AError::from_rpc(codes::METHOD_NOT_FOUND, "no such method".into(), None);
        assert!(matches!(err, A2AError::JsonRpc { code: -32601, .. }));
    }

    #[test]
    fn test_task_error_from_execution_failure() {
        let err = A2AError::ExecutionFailed("model offline".into());
        let task_error = TaskError::from(&err);
        assert_eq!(task_error.code, "EXECUTION_FAILED");
        assert!(task_error.message.contains("model offline"));
    }
}
