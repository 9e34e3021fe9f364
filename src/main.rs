use std::error::Error;
use std::sync::Arc;

use dotenvy::dotenv;
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree;
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;

use funnelbot::commands::Command;
use funnelbot::config::Config;
use funnelbot::content::BotContent;
use funnelbot::database::{Connection, Storage};
use funnelbot::dispatch;
use funnelbot::state::StateStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .with_target(false)
        .with_line_number(true)
        .init();

    let config = Arc::new(Config::from_env().expect("configuration error"));

    let connection = Connection::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    connection.migrate().await.expect("failed to run migrations");
    let storage: Arc<dyn Storage> = Arc::new(connection);

    let content = Arc::new(BotContent::default_funnel().expect("invalid quiz definition"));
    let store = Arc::new(StateStore::new());

    let bot = Bot::new(config.bot_token.clone());
    bot.set_my_commands(Command::bot_commands())
        .await
        .expect("failed to register bot commands");

    log::info!("starting funnel bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![store, storage, content, Arc::clone(&config)])
        .enable_ctrlc_handler()
        .build();

    if let Some((addr, url)) = config.webhook.clone() {
        let listener = webhooks::axum(bot, webhooks::Options::new(addr, url))
            .await
            .expect("failed to start webhook listener");
        dispatcher
            .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
            .await;
    } else {
        dispatcher.dispatch().await;
    }
}

fn schema() -> UpdateHandler<Box<dyn Error + Send + Sync + 'static>> {
    dptree::entry().endpoint(dispatch::handle_update)
}
