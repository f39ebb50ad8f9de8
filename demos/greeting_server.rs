use std::sync::Arc;

use a2a_basic::prelude::*;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

const AGENT_URL: &str = "http://localhost:9999/";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let card = greeting_card(AGENT_URL.parse().context("invalid agent url")?);

    let handler = DefaultRequestHandler::new(
        Arc::new(GreetingAgentExecutor::new()),
        Arc::new(InMemoryTaskStore::new()),
    );

    A2AServer::new(card, Arc::new(handler))
        .with_config(ServerConfig::default())
        .run()
        .await
        .context("greeting server failed")?;

    Ok(())
}
