//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::ServiceBuilder;
use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::{Codec, JsonRpcCodec},
    layer::{A2AValidationLayer, A2AValidationService},
    protocol::error::A2AError,
    service::A2AProtocolService,
    transport::{HttpTransport, Transport},
};

/// The service stack produced by [`A2AClientBuilder::build`]
pub type ClientService<T> = A2AValidationService<A2AProtocolService<T>>;

/// Builder for constructing A2A clients
///
/// This builder provides a fluent API for configuring and building an A2A client
/// with customizable transport, codec, timeouts, and validation.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_basic::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "http://localhost:9999/".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_timeout(Duration::from_secs(60))
///     .build()?;
///
/// let task = client.get_task("task-123").await?;
/// println!("Task status: {:?}", task.status);
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    agent_url: Url,
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    timeout: Duration,
    validate_responses: bool,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Start building a client for the agent at `agent_url`
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            transport: None,
            codec: None,
            timeout: Duration::from_secs(30),
            validate_responses: true,
        }
    }

    /// Use a custom transport
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport implementation to use
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable response validation
    ///
    /// # Arguments
    ///
    /// * `enabled` - Whether to validate responses (default: true)
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    /// Build the A2A client
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured
    pub fn build(self) -> Result<AgentClient<ClientService<T>>, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Protocol(
                "Transport not configured. Use new_http() or with_transport()".into(),
            )
        })?;

        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonRpcCodec));

        let service = ServiceBuilder::new()
            .layer(A2AValidationLayer::new().responses(self.validate_responses))
            .service(A2AProtocolService::new(transport, codec));

        let config = ClientConfig::new(self.agent_url.to_string())
            .with_timeout(self.timeout)
            .with_validation(self.validate_responses);

        Ok(AgentClient::new(service, config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder with HTTP transport
    ///
    /// # Arguments
    ///
    /// * `agent_url` - The JSON-RPC endpoint of the agent, as advertised in its card
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::new(agent_url).with_transport(transport)
    }
}
