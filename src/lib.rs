//! # A2A Basic
//!
//! A minimal implementation of the Agent2Agent (A2A) protocol: agent card
//! discovery, JSON-RPC request handling over an event queue, and a greeting
//! agent to exercise both ends.
//!
//! The client is built from Tower's Service and Layer abstractions over a
//! pluggable transport. The server drives an [`AgentExecutor`](server::AgentExecutor)
//! through a request handler and exposes it with axum.
//!
//! ## Features
//!
//! - **Discovery**: fetch and validate a remote agent's card
//! - **Composable client**: validation as a Tower layer over the protocol service
//! - **Task lifecycle**: in-memory task store with per-task serialized updates
//! - **Cancellation**: cooperative cancel routed to the running executor
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_basic::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "http://localhost:9999".parse()?;
//!     let mut session = ClientSession::connect(url);
//!
//!     let outcome = session
//!         .run("Hello, how are you?", DEFAULT_RESPONSE_TEXT_PATH)
//!         .await?;
//!     println!("{} says: {:?}", outcome.card.name, outcome.extracted);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod greeting;
pub mod layer;
pub mod protocol;
pub mod server;
pub mod service;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{
            A2AClientBuilder, AgentCardResolver, AgentClient, ClientSession, SessionOutcome,
            DEFAULT_RESPONSE_TEXT_PATH,
        },
        greeting::{greeting_card, GreetingAgentExecutor},
        protocol::error::A2AError,
        protocol::{
            A2AOperation, AgentCard, Event, Message, Part, Role, SendMessageResult, Task,
            TaskStatus, TaskStatusUpdate,
        },
        server::{
            A2AServer, AgentExecutor, DefaultRequestHandler, EventQueue, InMemoryTaskStore,
            RequestContext, ServerConfig,
        },
    };
}
