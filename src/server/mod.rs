//! Server side of the protocol: request handling, task storage and the HTTP app

pub mod app;
pub mod config;
pub mod context;
pub mod executor;
pub mod handler;
pub mod jsonrpc;
pub mod queue;
pub mod store;

pub use app::A2AServer;
pub use config::ServerConfig;
pub use context::RequestContext;
pub use executor::AgentExecutor;
pub use handler::{DefaultRequestHandler, RequestHandler};
pub use jsonrpc::dispatch;
pub use queue::EventQueue;
pub use store::{InMemoryTaskStore, TaskMutator, TaskStore};
