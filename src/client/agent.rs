//! High-level A2A agent client

use tower_service::Service;

use crate::{
    client::config::ClientConfig,
    protocol::{error::A2AError, A2AOperation, Message, Task},
    service::{A2ARequest, A2AResponse, CallContext, SendMessageResponse},
};

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides convenient methods for the
/// JSON-RPC operations of the protocol. The service is generic over any
/// implementation that satisfies the Service trait bounds.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_basic::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "http://localhost:9999/".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url).build()?;
///
/// let response = client.send_message(Message::user("Hello, agent!")).await?;
/// println!("Reply: {:?}", response.result);
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a call context from the client configuration
    fn build_context(&self) -> CallContext {
        CallContext::new(self.config.agent_url.clone()).with_timeout(self.config.timeout)
    }

    async fn call(&mut self, operation: A2AOperation) -> Result<(String, A2AResponse), A2AError> {
        let request = A2ARequest::new(operation, self.build_context());
        let id = request.id.clone();

        std::future::poll_fn(|cx| self.service.poll_ready(cx)).await?;
        let response = self.service.call(request).await?;

        Ok((id, response))
    }

    /// Send a message to the agent
    ///
    /// # Returns
    ///
    /// The correlated response envelope; its `result` is the agent's reply
    /// message, or the task when the agent produced no message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message fails to send or the response is invalid
    pub async fn send_message(&mut self, message: Message) -> Result<SendMessageResponse, A2AError> {
        let (id, response) = self.call(A2AOperation::SendMessage { message }).await?;

        let result = response.into_send_result().ok_or_else(|| {
            A2AError::Protocol("Expected message or task result from send_message".into())
        })?;

        Ok(SendMessageResponse::new(id, result))
    }

    /// Get a task by ID
    ///
    /// # Errors
    ///
    /// Returns `A2AError::TaskNotFound` if the task doesn't exist
    pub async fn get_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let (_, response) = self
            .call(A2AOperation::GetTask {
                task_id: task_id.into(),
            })
            .await?;

        response
            .into_task()
            .ok_or_else(|| A2AError::Protocol("Expected task response from get_task".into()))
    }

    /// Cancel a task by ID
    ///
    /// # Errors
    ///
    /// Returns `A2AError::UnsupportedOperation` if the agent declined to cancel;
    /// the task is left as it was.
    pub async fn cancel_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let (_, response) = self
            .call(A2AOperation::CancelTask {
                task_id: task_id.into(),
            })
            .await?;

        response
            .into_task()
            .ok_or_else(|| A2AError::Protocol("Expected task response from cancel_task".into()))
    }
}
