//! A2A service request types

use std::{collections::HashMap, time::Duration};

use uuid::Uuid;

use crate::protocol::operation::A2AOperation;

/// A request to the A2A service
///
/// This wraps an A2A operation with the correlation id it is sent under and
/// the per-call context.
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// Correlation id echoed back by the remote agent
    pub id: String,

    /// The A2A operation to execute
    pub operation: A2AOperation,

    /// Call context (timeouts, metadata)
    pub context: CallContext,
}

impl A2ARequest {
    /// Create a new A2A request with a fresh correlation id
    pub fn new(operation: A2AOperation, context: CallContext) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            operation,
            context,
        }
    }
}

/// Per-call context: where the call goes and how long it may take
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Base URL of the target agent
    pub agent_url: String,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// Additional metadata headers
    pub metadata: HashMap<String, String>,
}

impl CallContext {
    /// Create a new call context
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            ..Self::default()
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a metadata header
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            agent_url: String::new(),
            timeout: Some(Duration::from_secs(30)),
            metadata: HashMap::new(),
        }
    }
}
