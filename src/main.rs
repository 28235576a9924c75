use lineup_buddy::{
    bot::{self, BotData},
    config::{
        load_config,
        storage::{get_config_path, get_data_dir},
    },
    errors::{Error, Result},
    storage::{JsonFileStore, Persistence},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load and validate the league configuration
    let config_path = get_config_path();
    let app_config = load_config(&config_path)
        .inspect_err(|e| error!("Failed to load {}: {}", config_path.display(), e))?;
    info!(
        leagues = app_config.leagues.configured().count(),
        "Successfully processed application configuration."
    );

    // 4. Open the JSON tables and load every store
    let data_dir = get_data_dir();
    let persistence: Arc<dyn Persistence> = Arc::new(
        JsonFileStore::open(&data_dir)
            .inspect_err(|e| error!("Failed to open data dir {}: {}", data_dir.display(), e))?,
    );
    let data = BotData::open(Arc::new(app_config), &persistence)?;
    info!("Loaded bot data from {}", data_dir.display());

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, data).await
}
