//! The greeting agent: a fixed reply behind the executor interface

use async_trait::async_trait;
use url::Url;

use crate::{
    protocol::{error::A2AError, AgentCapabilities, AgentCard, AgentSkill, Message},
    server::{AgentExecutor, EventQueue, RequestContext},
};

/// The text every greeting reply carries
pub const GREETING: &str = "Hello World! This is a greeting from the A2A GreetingAgent.";

/// Agent logic: always greets
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetingAgent;

impl GreetingAgent {
    pub async fn invoke(&self) -> String {
        GREETING.to_string()
    }
}

/// Runs [`GreetingAgent`] for each request
///
/// Publishes exactly one agent text message. Greetings finish immediately, so
/// cancellation is not supported.
#[derive(Debug, Clone, Default)]
pub struct GreetingAgentExecutor {
    agent: GreetingAgent,
}

impl GreetingAgentExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentExecutor for GreetingAgentExecutor {
    async fn execute(&self, context: &RequestContext, queue: &EventQueue) -> Result<(), A2AError> {
        let reply = Message::agent(self.agent.invoke().await).with_task_id(&context.task_id);
        queue.enqueue(reply)
    }

    async fn cancel(&self, context: &RequestContext, _queue: &EventQueue) -> Result<(), A2AError> {
        tracing::debug!(task_id = %context.task_id, "greeting agent cannot cancel");
        Err(A2AError::UnsupportedOperation("cancel".into()))
    }
}

/// The card the greeting agent is served with, advertising `url` as its endpoint
pub fn greeting_card(url: Url) -> AgentCard {
    let skill = AgentSkill::new("greet", "Greet", "Returns a greeting.")
        .with_tags(&["greeting", "hello", "world"])
        .with_examples(&["hello", "hi", "hey"]);

    AgentCard::new(
        "Greeting Agent",
        "A simple agent that returns a greeting.",
        url,
        "0.0.1",
    )
    .with_modes(&["text"], &["text"])
    .with_capabilities(AgentCapabilities::default())
    .with_skill(skill)
}
