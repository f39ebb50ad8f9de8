//! Server configuration

use std::net::SocketAddr;

use tokio::net::lookup_host;

use crate::protocol::{agent::AGENT_CARD_PATH, error::A2AError};

/// Where and how the agent server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// TCP port to bind
    pub port: u16,

    /// Path the agent card is served at
    pub card_path: String,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            card_path: AGENT_CARD_PATH.to_string(),
        }
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Serve the agent card somewhere other than the well-known path
    pub fn with_card_path(mut self, card_path: impl Into<String>) -> Self {
        self.card_path = card_path.into();
        self
    }

    /// Resolve the socket address to bind; `host` may be an IP literal or a hostname
    ///
    /// # Errors
    ///
    /// Returns `A2AError::Validation` if the host does not resolve to any address
    pub async fn socket_addr(&self) -> Result<SocketAddr, A2AError> {
        let invalid = |reason: String| {
            A2AError::Validation(format!(
                "Invalid server address {}:{}: {reason}",
                self.host, self.port
            ))
        };

        lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("no addresses found".into()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 9999)
    }
}
