//! Agent discovery and capability types

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::{A2AError, A2AResult};

/// Conventional path of the public agent card, relative to the agent's base URL
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Agent Card for agent discovery
///
/// The Agent Card is published at [`AGENT_CARD_PATH`] and describes the
/// agent's endpoint, supported content modes, capabilities and skills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// Endpoint that accepts JSON-RPC requests
    pub url: Url,

    /// Agent version
    pub version: String,

    /// Content types accepted by default
    #[serde(default)]
    pub default_input_modes: Vec<String>,

    /// Content types produced by default
    #[serde(default)]
    pub default_output_modes: Vec<String>,

    /// Agent capabilities
    #[serde(default)]
    pub capabilities: AgentCapabilities,

    /// Skills offered by the agent (may be empty)
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    /// Create a new agent card
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: Url,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url,
            version: version.into(),
            default_input_modes: Vec::new(),
            default_output_modes: Vec::new(),
            capabilities: AgentCapabilities::default(),
            skills: Vec::new(),
        }
    }

    /// Set the default input and output modes
    pub fn with_modes(mut self, input: &[&str], output: &[&str]) -> Self {
        self.default_input_modes = input.iter().map(|m| m.to_string()).collect();
        self.default_output_modes = output.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Set the agent capabilities
    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Add a skill to the agent card
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Look up a skill by id
    pub fn skill(&self, id: &str) -> Option<&AgentSkill> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Check the card invariants
    ///
    /// Skill ids must be unique within the card. A card without skills is valid.
    pub fn validate(&self) -> A2AResult<()> {
        if self.name.trim().is_empty() {
            return Err(A2AError::CardMalformed("Agent name cannot be empty".into()));
        }

        let mut seen = HashSet::new();
        for skill in &self.skills {
            if !seen.insert(skill.id.as_str()) {
                return Err(A2AError::CardMalformed(format!(
                    "Duplicate skill id: {}",
                    skill.id
                )));
            }
        }

        Ok(())
    }
}

/// Agent capabilities
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Supports streaming responses
    #[serde(default)]
    pub streaming: bool,

    /// Supports push notifications via webhooks
    #[serde(default)]
    pub push_notifications: bool,

    /// Records the history of task state transitions
    #[serde(default)]
    pub state_transition_history: bool,
}

impl AgentCapabilities {
    /// Create capabilities with default values (all false)
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable state transition history
    pub fn with_state_transition_history(mut self) -> Self {
        self.state_transition_history = true;
        self
    }
}

/// A unit of functionality advertised by an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Identifier, unique within the owning card
    pub id: String,

    /// Human readable name
    pub name: String,

    /// What the skill does
    #[serde(default)]
    pub description: String,

    /// Keywords describing the skill
    #[serde(default)]
    pub tags: Vec<String>,

    /// Example utterances that exercise the skill
    #[serde(default)]
    pub examples: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_modes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_modes: Option<Vec<String>>,
}

impl AgentSkill {
    /// Create a new skill
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            examples: Vec::new(),
            input_modes: None,
            output_modes: None,
        }
    }

    /// Set the skill tags
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set the example utterances
    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|e| e.to_string()).collect();
        self
    }
}
