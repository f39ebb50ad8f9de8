//! Agent card discovery

use crate::{
    protocol::{agent::AgentCard, error::A2AError},
    transport::{endpoint_url, Transport, TransportRequest},
};

/// Fetches and parses a remote agent's card
///
/// Every call to [`resolve`](Self::resolve) goes to the network; nothing is cached.
#[derive(Debug, Clone)]
pub struct AgentCardResolver<T> {
    transport: T,
    card_path: String,
}

impl<T: Transport> AgentCardResolver<T> {
    /// Create a resolver for the card at `card_path` under the transport's base URL
    pub fn new(transport: T, card_path: impl Into<String>) -> Self {
        Self {
            transport,
            card_path: card_path.into(),
        }
    }

    /// Full URL the card is fetched from
    pub fn card_url(&self) -> String {
        endpoint_url(self.transport.base_url(), &self.card_path)
    }

    /// Fetch and parse the agent card
    ///
    /// # Errors
    ///
    /// * `A2AError::CardUnavailable` - the transport failed or answered with a
    ///   non-success status
    /// * `A2AError::CardMalformed` - the body is not a valid agent card
    pub async fn resolve(&self) -> Result<AgentCard, A2AError> {
        let url = self.card_url();
        let unavailable = |reason: String| A2AError::CardUnavailable {
            url: url.clone(),
            reason,
        };

        let request =
            TransportRequest::new(self.card_path.clone(), "GET").header("Accept", "application/json");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.is_success() {
            return Err(unavailable(format!("HTTP status {}", response.status)));
        }

        let card: AgentCard = serde_json::from_slice(&response.body)
            .map_err(|e| A2AError::CardMalformed(e.to_string()))?;
        card.validate()?;

        tracing::debug!(agent = %card.name, %url, skills = card.skills.len(), "resolved agent card");
        Ok(card)
    }
}
