//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{error::A2AError, operation::A2AOperation, task::TaskStatus},
    service::{A2ARequest, A2AResponse},
};

/// Layer that validates A2A protocol requests and responses
#[derive(Clone, Debug)]
pub struct A2AValidationLayer {
    validate_responses: bool,
}

impl A2AValidationLayer {
    /// Create a new validation layer checking both directions
    pub fn new() -> Self {
        Self {
            validate_responses: true,
        }
    }

    /// Enable or disable response validation (requests are always checked)
    pub fn responses(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }
}

impl Default for A2AValidationLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService {
            inner,
            validate_responses: self.validate_responses,
        }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone)]
pub struct A2AValidationService<S> {
    inner: S,
    validate_responses: bool,
}

impl<S> A2AValidationService<S> {
    /// Validate an A2A request
    fn validate_request(req: &A2ARequest) -> Result<(), A2AError> {
        match &req.operation {
            A2AOperation::SendMessage { message } => message.validate()?,
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                if task_id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
        }

        if req.context.agent_url.is_empty() {
            return Err(A2AError::Validation("Agent URL cannot be empty".into()));
        }

        Ok(())
    }

    /// Validate an A2A response
    fn validate_response(resp: &A2AResponse) -> Result<(), A2AError> {
        match resp {
            A2AResponse::Message(message) => message.validate()?,
            A2AResponse::Task(task) => {
                if task.id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
                if task.status == TaskStatus::Failed && task.error.is_none() {
                    return Err(A2AError::Validation(
                        "Failed task must have an error".into(),
                    ));
                }
            }
            A2AResponse::Empty => {}
        }

        Ok(())
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        if let Err(e) = Self::validate_request(&req) {
            return Box::pin(async move { Err(e) });
        }

        // Drive the service that was polled ready; leave the clone for the next call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let validate_responses = self.validate_responses;
        Box::pin(async move {
            let response = inner.call(req).await?;

            if validate_responses {
                Self::validate_response(&response)?;
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        protocol::{message::Message, task::Task},
        service::CallContext,
    };

    use super::*;

    #[test]
    fn test_validate_send_message() {
        let operation = A2AOperation::SendMessage {
            message: Message::user("Hello"),
        };
        let request = A2ARequest::new(operation, CallContext::new("http://localhost:9999/"));

        assert!(A2AValidationService::<()>::validate_request(&request).is_ok());
    }

    #[test]
    fn test_validate_empty_message() {
        let mut message = Message::user("Test");
        message.parts.clear();

        let operation = A2AOperation::SendMessage { message };
        let request = A2ARequest::new(operation, CallContext::new("http://localhost:9999/"));

        assert!(A2AValidationService::<()>::validate_request(&request).is_err());
    }

    #[test]
    fn test_validate_blank_message_id() {
        let mut message = Message::user("Test");
        message.message_id.clear();

        let operation = A2AOperation::SendMessage { message };
        let request = A2ARequest::new(operation, CallContext::new("http://localhost:9999/"));

        assert!(matches!(
            A2AValidationService::<()>::validate_request(&request),
            Err(A2AError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_missing_agent_url() {
        let operation = A2AOperation::GetTask {
            task_id: "task-1".into(),
        };
        let request = A2ARequest::new(operation, CallContext::default());

        assert!(A2AValidationService::<()>::validate_request(&request).is_err());
    }

    #[test]
    fn test_validate_task_response() {
        let task = Task::new("task-123", Message::user("Test"));
        let response = A2AResponse::Task(Box::new(task));
        assert!(A2AValidationService::<()>::validate_response(&response).is_ok());

        let mut failed = Task::new("task-124", Message::user("Test"));
        failed.status = TaskStatus::Failed;
        let response = A2AResponse::Task(Box::new(failed));
        assert!(A2AValidationService::<()>::validate_response(&response).is_err());
    }
}
