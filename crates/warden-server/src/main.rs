mod config;
mod handlers;
mod health;

use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;
use tracing::{error, info};

use warden_bot::{SharedWarden, TelegramApi, Warden};
use warden_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "warden_server=info,warden_bot=info,warden_db=info,teloxide=warn,tower_http=info".into()
            }),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    info!(owner_id = config.owner_id.0, db_path = %config.db_path.display(), "Starting Warden");

    let db = Database::open(&config.db_path)?;

    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await.context("getMe failed, check the bot token")?;
    let bot_username = me.username().to_string();
    info!("Bot username: @{}", bot_username);

    let warden: SharedWarden<TelegramApi> = Arc::new(Warden::new(
        TelegramApi::new(bot.clone()),
        db,
        config.settings(bot_username),
    ));

    let health_addr = config.health_addr()?;
    tokio::spawn(async move {
        if let Err(e) = health::serve(health_addr).await {
            error!(error = %e, "Health listener stopped");
        }
    });

    info!("Bot is running and accepting join requests");

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![warden])
        .default_handler(|_| async {})
        .error_handler(LoggingErrorHandler::with_custom_text("Dispatcher error"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Warden stopped");
    Ok(())
}
