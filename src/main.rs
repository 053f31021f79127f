mod bot;
mod config;
mod filter;
mod llm;
mod relay;
mod translator;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::llm::LlmClient;
use crate::relay::Relay;
use crate::translator::LlmTranslator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,translate_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from: {}", path.display());
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Provider: {}", config.llm.provider);
    info!("  Model: {}", config.llm.model);
    info!("  Allowed chats: {:?}", config.telegram.allowed_chat_ids);

    let translator = Arc::new(LlmTranslator::new(LlmClient::new(config.llm.clone())));
    let relay = Arc::new(Relay::new(
        config.telegram.allowed_chat_ids.iter().copied(),
        translator,
    ));

    let bot = Bot::new(&config.telegram.bot_token);

    info!("Bot is starting...");
    bot::run(bot, relay).await?;

    Ok(())
}
