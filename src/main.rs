use anyhow::Result;
use rusqlite::Connection;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xiuxian_helper::bot;
use xiuxian_helper::config::Config;
use xiuxian_helper::db;
use xiuxian_helper::dialogue::ShopDialogueState;
use xiuxian_helper::relay::PendingCommands;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging; the default subscriber also carries `log` records
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Xiuxian Helper Bot");

    // Configuration is validated up front; a missing or placeholder token
    // aborts startup instead of being defaulted.
    let config = Config::from_env()?;

    info!("Initializing database at: {}", config.database_url);

    let conn = Connection::open(&config.database_url)?;
    db::init_database_schema(&conn)?;

    // Wrap connection in Arc<Mutex> for sharing across async tasks
    let shared_conn = Arc::new(Mutex::new(conn));
    let pending = Arc::new(PendingCommands::new(config.command_ttl));

    let bot = Bot::new(config.bot_token.clone());

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<ShopDialogueState>, ShopDialogueState>()
                .endpoint(bot::message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<ShopDialogueState>, ShopDialogueState>()
                .endpoint(bot::callback_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<ShopDialogueState>::new(),
            shared_conn,
            Arc::new(config),
            pending
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
