//! High-level client API for A2A protocol

pub mod agent;
pub mod builder;
pub mod config;
pub mod extract;
pub mod resolver;
pub mod session;

pub use agent::AgentClient;
pub use builder::{A2AClientBuilder, ClientService};
pub use config::ClientConfig;
pub use extract::{extract, extract_str};
pub use resolver::AgentCardResolver;
pub use session::{ClientSession, SessionOutcome, DEFAULT_RESPONSE_TEXT_PATH};
