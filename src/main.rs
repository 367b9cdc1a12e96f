use std::sync::Arc;

use camp_bot::channels::{ChatChannel, TelegramChannel};
use camp_bot::config::BotConfig;
use camp_bot::dispatch::Dispatcher;
use camp_bot::store::json_backend::JsonFileStore;
use camp_bot::store::registrations::RegistrationStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up .env before reading any configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export TELEGRAM_BOT_TOKEN=123456:ABC-...");
        std::process::exit(1);
    });

    eprintln!("🏕 Camp Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Data dir: {}", config.data_dir.display());
    eprintln!(
        "   Operator notifications: {}",
        match config.admin_chat_id {
            Some(id) => format!("enabled (chat {id})"),
            None => "disabled".to_string(),
        }
    );

    let store: Arc<dyn RegistrationStore> = Arc::new(
        JsonFileStore::open(&config.data_dir)
            .await
            .unwrap_or_else(|e| {
                eprintln!(
                    "Error: failed to open registration store at {}: {e}",
                    config.data_dir.display()
                );
                std::process::exit(1);
            }),
    );
    eprintln!("   Registrations: {} on record\n", store.len().await);

    let channel: Arc<dyn ChatChannel> = Arc::new(TelegramChannel::new(config.bot_token.clone()));

    tracing::info!("🚀 Bot starting");
    let mut dispatcher = Dispatcher::new(channel, store, config.admin_chat_id);
    dispatcher.run().await?;

    Ok(())
}
