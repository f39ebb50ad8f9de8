//! A2A message types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::{A2AError, A2AResult};

/// A message in the A2A protocol
///
/// Messages are the primary unit of communication between agents.
/// Each message has a unique id assigned once by its author, a role
/// (user or agent) and one or more parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message identifier, never mutated after creation
    #[serde(rename = "messageId")]
    pub message_id: String,

    /// Role of the message sender
    pub role: Role,

    /// Message content parts (at least one required for outbound messages)
    pub parts: Vec<Part>,

    /// Optional task identifier (for associating message with a task)
    #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Optional context identifier
    #[serde(rename = "contextId", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Optional metadata for the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Message {
    /// Create a new message with text content and a fresh id
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            message_id: new_message_id(),
            role,
            parts: vec![Part::text(text)],
            task_id: None,
            context_id: None,
            metadata: None,
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Create a new message builder
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Associate the message with a task
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Add a metadata field to the message
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Check the invariants of a well-formed message
    pub fn validate(&self) -> A2AResult<()> {
        if self.message_id.trim().is_empty() {
            return Err(A2AError::Validation("Message id cannot be empty".into()));
        }
        if self.parts.is_empty() {
            return Err(A2AError::Validation(
                "Message must have at least one part".into(),
            ));
        }
        Ok(())
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Generate a fresh, time-ordered message id
pub fn new_message_id() -> String {
    Uuid::now_v7().to_string()
}

/// Builder for constructing Message instances
#[derive(Debug, Default)]
pub struct MessageBuilder {
    role: Option<Role>,
    parts: Vec<Part>,
    message_id: Option<String>,
    task_id: Option<String>,
    context_id: Option<String>,
    metadata: Option<HashMap<String, Value>>,
}

impl MessageBuilder {
    /// Create a new message builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role of the message
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Add a single part to the message
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Set the message ID (a fresh one is generated otherwise)
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Set the task ID
    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    /// Set the context ID
    pub fn context_id(mut self, id: impl Into<String>) -> Self {
        self.context_id = Some(id.into());
        self
    }

    /// Add a metadata field
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Build the message
    ///
    /// # Errors
    ///
    /// Returns `A2AError::Validation` if the role is missing, the parts are empty
    /// or an explicitly supplied message id is blank.
    pub fn build(self) -> A2AResult<Message> {
        let role = self
            .role
            .ok_or_else(|| A2AError::Validation("Message role is required".into()))?;

        let message = Message {
            message_id: self.message_id.unwrap_or_else(new_message_id),
            role,
            parts: self.parts,
            task_id: self.task_id,
            context_id: self.context_id,
            metadata: self.metadata,
        };
        message.validate()?;

        Ok(message)
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    User,

    /// Message from an AI agent
    Agent,
}

/// A part of a message
///
/// A part carries exactly one kind of content. Only text is produced by the
/// greeting agent; the other variants exist so consumers match defensively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text {
        /// The text content
        text: String,
    },

    /// File reference
    File {
        /// File content
        file: FileContent,
    },

    /// Structured data
    Data {
        /// The structured data
        data: Value,
    },
}

/// File content for file parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    /// Name of the file
    pub name: String,

    /// MIME type of the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// URI reference to the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a file part with URI reference
    pub fn file(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::File {
            file: FileContent {
                name: name.into(),
                media_type: None,
                uri: Some(uri.into()),
            },
        }
    }

    /// Create a data part
    pub fn data(data: Value) -> Self {
        Self::Data { data }
    }

    /// The text of a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }
}
