//! One client round trip: resolve the card, send a message, read the reply

use std::collections::HashSet;

use serde_json::Value;
use url::Url;

use crate::{
    client::{
        builder::{A2AClientBuilder, ClientService},
        extract, AgentCardResolver, AgentClient, ClientConfig,
    },
    protocol::{error::A2AError, message::new_message_id, AgentCard, Message},
    service::SendMessageResponse,
    transport::{HttpTransport, Transport},
};

/// Path of the reply text inside a `message/send` response envelope
pub const DEFAULT_RESPONSE_TEXT_PATH: &str = "result.parts.0.text";

/// What a completed [`ClientSession::run`] produced
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// The card the message was sent against
    pub card: AgentCard,

    /// The full JSON-RPC response envelope
    pub response: Value,

    /// The value found at the requested path, if any
    pub extracted: Option<Value>,
}

/// Drives the client side of the protocol against a single agent
///
/// The session resolves the agent card before anything is sent. Messages are
/// delivered to the endpoint named in the card, which need not be the URL the
/// card was fetched from.
pub struct ClientSession<T: Transport> {
    transport: T,
    config: ClientConfig,
    card: Option<AgentCard>,
    client: Option<AgentClient<ClientService<T>>>,
    issued: HashSet<String>,
}

impl ClientSession<HttpTransport> {
    /// Open a session over HTTP against the agent at `base_url`
    pub fn connect(base_url: Url) -> Self {
        let config = ClientConfig::new(base_url.to_string());
        Self::new(HttpTransport::new(base_url), config)
    }
}

impl<T: Transport> ClientSession<T> {
    /// Create a session; the transport's base URL is where the card is fetched from
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            card: None,
            client: None,
            issued: HashSet::new(),
        }
    }

    /// The resolved card, if [`resolve_card`](Self::resolve_card) succeeded
    pub fn card(&self) -> Option<&AgentCard> {
        self.card.as_ref()
    }

    /// Fetch the agent card and bind a client to the endpoint it advertises
    ///
    /// # Errors
    ///
    /// Propagates `CardUnavailable`/`CardMalformed` from the resolver. The
    /// session keeps no card in that case and nothing can be sent.
    pub async fn resolve_card(&mut self) -> Result<&AgentCard, A2AError> {
        let resolver = AgentCardResolver::new(self.transport.clone(), &self.config.card_path);

        tracing::info!(url = %resolver.card_url(), "fetching agent card");
        let card = match resolver.resolve().await {
            Ok(card) => card,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch agent card; cannot continue");
                self.card = None;
                self.client = None;
                return Err(e);
            }
        };
        tracing::info!(agent = %card.name, endpoint = %card.url, "agent card resolved");

        let client = A2AClientBuilder::new(card.url.clone())
            .with_transport(self.transport.with_base_url(card.url.clone()))
            .with_timeout(self.config.timeout)
            .with_validation(self.config.validate_responses)
            .build()?;

        self.client = Some(client);
        Ok(&*self.card.insert(card))
    }

    /// Build a user message carrying `text` with a message id not used before in this session
    pub fn build_message(&mut self, text: impl Into<String>) -> Message {
        let mut message = Message::user(text);
        while !self.issued.insert(message.message_id.clone()) {
            message.message_id = new_message_id();
        }
        message
    }

    /// Send `text` to the agent and return the response envelope
    ///
    /// # Errors
    ///
    /// Returns `A2AError::Protocol` if no card has been resolved yet, or any
    /// error raised by the call itself.
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<SendMessageResponse, A2AError> {
        let message = self.build_message(text);
        let client = self.client.as_mut().ok_or_else(|| {
            A2AError::Protocol("agent card not resolved; call resolve_card first".into())
        })?;

        tracing::debug!(message_id = %message.message_id, "sending message");
        client.send_message(message).await
    }

    /// Resolve the card, send `text` and read `path` from the response
    ///
    /// # Errors
    ///
    /// Card failures abort the session before any message is sent.
    pub async fn run(&mut self, text: impl Into<String>, path: &str) -> Result<SessionOutcome, A2AError> {
        let card = self.resolve_card().await?.clone();
        let response = serde_json::to_value(self.send_text(text).await?)?;

        let extracted = extract::extract(&response, path).cloned();
        match &extracted {
            Some(value) => tracing::info!(%path, %value, "extracted response field"),
            None => tracing::warn!(%path, "response field not found"),
        }

        Ok(SessionOutcome {
            card,
            response,
            extracted,
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use crate::transport::{mock::MockTransport, TransportResponse};

    use super::*;

    fn card_json(url: &str) -> Value {
        json!({
            "name": "Greeting Agent",
            "description": "A simple agent that returns a greeting.",
            "url": url,
            "version": "0.0.1",
            "defaultInputModes": ["text"],
            "defaultOutputModes": ["text"],
            "capabilities": {},
            "skills": [{
                "id": "greet",
                "name": "Greet",
                "description": "Returns a greeting.",
                "tags": ["greeting"],
                "examples": ["hi"]
            }]
        })
    }

    fn json_response(body: &Value) -> TransportResponse {
        TransportResponse::new(200).body(Bytes::from(serde_json::to_vec(body).unwrap()))
    }

    /// Serves the card on GET and echoes a greeting on POST
    fn agent(card_url: &'static str) -> MockTransport {
        MockTransport::new(move |req| {
            if req.method == "GET" {
                return json_response(&card_json(card_url));
            }
            let request: Value = serde_json::from_slice(&req.body).unwrap();
            json_response(&json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "result": {
                    "kind": "message",
                    "messageId": "reply-1",
                    "role": "agent",
                    "parts": [{"text": "Hello World!"}]
                }
            }))
        })
    }

    fn session(transport: MockTransport) -> ClientSession<MockTransport> {
        ClientSession::new(transport, ClientConfig::new("http://mock.local/"))
    }

    #[tokio::test]
    async fn test_run_extracts_reply_text() {
        let mut session = session(agent("http://mock.local/"));

        let outcome = session
            .run("Hello, how are you?", DEFAULT_RESPONSE_TEXT_PATH)
            .await
            .unwrap();

        assert_eq!(outcome.card.name, "Greeting Agent");
        assert_eq!(outcome.extracted, Some(json!("Hello World!")));
        assert_eq!(outcome.response["jsonrpc"], "2.0");
    }

    #[tokio::test]
    async fn test_message_goes_to_card_endpoint() {
        let transport = agent("http://agent.internal/rpc");
        let mut session = session(transport.clone());

        session.run("hi", DEFAULT_RESPONSE_TEXT_PATH).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0.as_str(), "http://mock.local/");
        assert_eq!(sent[1].0.as_str(), "http://agent.internal/rpc");

        let body: Value = serde_json::from_slice(&sent[1].1.body).unwrap();
        assert_eq!(body["method"], "message/send");
        assert_eq!(body["params"]["message"]["role"], "user");
        assert_eq!(body["params"]["message"]["parts"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn test_card_failure_sends_nothing() {
        let transport = MockTransport::new(|_| TransportResponse::new(503));
        let mut session = session(transport.clone());

        let result = session.run("hi", DEFAULT_RESPONSE_TEXT_PATH).await;

        assert!(matches!(result, Err(A2AError::CardUnavailable { .. })));
        assert!(session.card().is_none());
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.requests()[0].1.method, "GET");
    }

    #[tokio::test]
    async fn test_send_before_resolve_fails() {
        let transport = agent("http://mock.local/");
        let mut session = session(transport.clone());

        let result = session.send_text("hi").await;
        assert!(matches!(result, Err(A2AError::Protocol(_))));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_message_ids_unique_within_session() {
        let mut session = session(MockTransport::ok());

        let ids: HashSet<String> = (0..100)
            .map(|_| session.build_message("hello").message_id)
            .collect();
        assert_eq!(ids.len(), 100);

        let message = session.build_message("hello");
        assert_eq!(message.role, crate::protocol::Role::User);
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.text(), "hello");
    }

    #[tokio::test]
    async fn test_missing_path_is_none() {
        let mut session = session(agent("http://mock.local/"));

        let outcome = session.run("hi", "result.parts.5.text").await.unwrap();
        assert_eq!(outcome.extracted, None);
    }
}
