//! HTTP surface of the agent, powered by axum
//!
//! Serves:
//! - `GET  <card_path>` (default `/.well-known/agent.json`): agent card discovery
//! - `POST <card url path>` (default `/`): JSON-RPC 2.0 endpoint
//! - `GET  /health`: health check

use std::{future::Future, sync::Arc};

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{
    codec::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse},
    protocol::{
        error::{codes, A2AError},
        AgentCard,
    },
    server::{config::ServerConfig, handler::RequestHandler, jsonrpc::dispatch},
};

#[derive(Clone)]
struct AppState {
    card: Arc<AgentCard>,
    handler: Arc<dyn RequestHandler>,
}

/// An agent card and request handler exposed over HTTP
pub struct A2AServer {
    config: ServerConfig,
    card: AgentCard,
    handler: Arc<dyn RequestHandler>,
}

impl A2AServer {
    pub fn new(card: AgentCard, handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            config: ServerConfig::default(),
            card,
            handler,
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        let rpc_path = self.card.url.path().to_string();
        let state = AppState {
            card: Arc::new(self.card.clone()),
            handler: self.handler.clone(),
        };

        Router::new()
            .route(&self.config.card_path, get(agent_card))
            .route(&rpc_path, post(handle_jsonrpc))
            .route("/health", get(health_check))
            .with_state(state)
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns `A2AError::Transport` if the server fails while running
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), A2AError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("A2A server listening on http://{}", addr);
            tracing::info!("   Agent Card: http://{}{}", addr, self.config.card_path);
            tracing::info!("   JSON-RPC:   {}", self.card.url);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| A2AError::Transport(format!("server error: {e}")))
    }

    /// Bind the configured address and serve until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid, cannot be bound, or the
    /// server fails while running
    pub async fn run(self) -> Result<(), A2AError> {
        let addr = self.config.socket_addr().await?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| A2AError::Transport(format!("failed to bind {addr}: {e}")))?;

        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                return;
            }
            tracing::info!("shutting down");
        })
        .await
    }
}

async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

async fn handle_jsonrpc(State(state): State<AppState>, body: Bytes) -> Json<JsonRpcResponse> {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable JSON-RPC body");
            return Json(JsonRpcResponse::error(
                Value::Null,
                JsonRpcError::new(codes::PARSE_ERROR, format!("Parse error: {e}")),
            ));
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            return Json(JsonRpcResponse::error(
                id,
                JsonRpcError::new(codes::INVALID_REQUEST, format!("Invalid request: {e}")),
            ));
        }
    };

    Json(dispatch(state.handler.as_ref(), request).await)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
