use a2a_basic::prelude::*;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

// Configuration - update these to match your agent
const BASE_URL: &str = "http://localhost:9999";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut session = ClientSession::connect(BASE_URL.parse().context("invalid base url")?);

    println!("Resolving agent card from {BASE_URL}...");
    let card = session
        .resolve_card()
        .await
        .context("failed to resolve the public agent card")?;
    println!(
        "Successfully resolved agent card:\n{}",
        serde_json::to_string_pretty(card)?
    );

    let response = match session.send_text("Hello, how are you?").await {
        Ok(response) => response,
        Err(e) => {
            println!("Error sending message to A2A server:\n{e}");
            return Ok(());
        }
    };

    let response = serde_json::to_value(&response)?;
    println!(
        "Received response from A2A server:\n{}",
        serde_json::to_string_pretty(&response)?
    );

    match a2a_basic::client::extract_str(&response, DEFAULT_RESPONSE_TEXT_PATH) {
        Some(text) => println!("Agent message: {text}"),
        None => println!("No text found in response"),
    }

    Ok(())
}
