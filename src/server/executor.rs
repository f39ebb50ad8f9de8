//! The capability interface an agent implements

use async_trait::async_trait;

use crate::{
    protocol::error::A2AError,
    server::{context::RequestContext, queue::EventQueue},
};

/// Agent logic driven by the request handler
///
/// Executors are pure producers: they read the [`RequestContext`] and publish
/// events to the queue. Task state is owned by the handler. The handler closes
/// the queue once `execute` returns, so implementations do not need to.
///
/// `cancel` may be invoked while `execute` is still running on the same
/// instance, so implementations must be safe to call concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentExecutor: Send + Sync + 'static {
    /// Run the agent for one request
    ///
    /// # Errors
    ///
    /// `A2AError::ExecutionFailed` when the agent could not produce a result.
    async fn execute(&self, context: &RequestContext, queue: &EventQueue) -> Result<(), A2AError>;

    /// Ask the agent to stop work on the context's task
    ///
    /// # Errors
    ///
    /// `A2AError::UnsupportedOperation("cancel")` from agents that cannot cancel.
    async fn cancel(&self, context: &RequestContext, queue: &EventQueue) -> Result<(), A2AError>;
}
