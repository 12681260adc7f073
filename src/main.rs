use bot::BotService;
use state::AppState;
use std::sync::Arc;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod bot;
mod catalog;
mod commands;
mod config;
mod engine;
mod error;
mod handlers;
mod keyboard;
mod services;
mod state;
#[cfg(test)]
mod tests;

use error::HandlerResult;
use services::store::SheetsStore;

#[tokio::main]
async fn main() -> HandlerResult<()> {
    dotenv::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = pretty_env_logger::try_init_timed();

    info!("Starting bot...");

    let config = config::build_config()?;

    let bot_service = BotService::new(&config)?;

    let store = Arc::new(SheetsStore::new(&config.sheets)?);

    info!("Initializing AppState...");
    let state = AppState::new(config, bot_service.bot.clone(), store)?;
    AppState::set_global(state)?;
    info!("AppState initialized");

    bot_service.start().await
}
