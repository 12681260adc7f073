use std::time::Duration;

use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;

use crate::commands;
use crate::config::AppConfig;
use crate::error::{BotResult, HandlerResult};
use crate::handlers::handler_tree;
use crate::state::AppState;

pub struct BotService {
    pub bot: Bot,
}

impl BotService {
    pub fn new(config: &AppConfig) -> BotResult<Self> {
        // teloxide's own reqwest, not the crate's direct dependency
        let client = teloxide::net::default_reqwest_settings()
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            bot: Bot::with_client(config.telegram.0.clone(), client),
        })
    }

    pub async fn start(&self) -> HandlerResult<()> {
        info!("Testing connection to Telegram API...");
        match self.bot.get_me().await {
            Ok(me) => info!("Connected as @{}", me.username()),
            Err(e) => {
                error!("Failed to connect to Telegram API: {:?}", e);
                return Err(anyhow::anyhow!("Failed to connect to Telegram API: {}", e).into());
            }
        }

        let state = AppState::get()?;

        commands::setup_commands(&self.bot).await?;
        spawn_session_sweeper(state.clone());

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler_tree())
            .default_handler(|update| async move {
                warn!("Unhandled update: {:?}", update);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build();

        match &state.config.webhook.host {
            Some(host) => {
                let addr = ([0, 0, 0, 0], state.config.webhook.port).into();
                let url = format!("https://{}/webhook", host).parse()?;
                info!("Starting webhook listener on port {}", state.config.webhook.port);

                let listener = webhooks::axum(self.bot.clone(), webhooks::Options::new(addr, url)).await?;
                dispatcher
                    .dispatch_with_listener(
                        listener,
                        LoggingErrorHandler::with_custom_text("An error from the update listener"),
                    )
                    .await;
            }
            None => {
                info!("Starting long polling");
                dispatcher.dispatch().await;
            }
        }

        Ok(())
    }
}

fn spawn_session_sweeper(state: AppState) {
    let ttl = Duration::from_secs(state.config.session.idle_ttl_secs);
    let interval = Duration::from_secs(state.config.session.sweep_interval_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // the first tick fires immediately
        loop {
            ticker.tick().await;
            state.sessions.sweep(ttl).await;
        }
    });
}
