//! Client configuration

use std::time::Duration;

use crate::protocol::agent::AGENT_CARD_PATH;

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent
    pub agent_url: String,

    /// Path of the agent card, relative to `agent_url`
    pub card_path: String,

    /// Default request timeout
    pub timeout: Duration,

    /// Enable response validation
    pub validate_responses: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            card_path: AGENT_CARD_PATH.to_string(),
            timeout: Duration::from_secs(30),
            validate_responses: true,
        }
    }

    /// Set the agent card path
    pub fn with_card_path(mut self, card_path: impl Into<String>) -> Self {
        self.card_path = card_path.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable response validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}
