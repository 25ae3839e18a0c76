use anyhow::Context;
use tracing_subscriber::EnvFilter;

use llm_gateway::{config::Config, gateway::DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    llm_gateway::gateway::serve(config).await
}
