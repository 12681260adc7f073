use std::sync::{Arc, OnceLock};

use teloxide::Bot;

use crate::catalog::MenuCatalog;
use crate::config::AppConfig;
use crate::engine::ConversationEngine;
use crate::error::{BotError, BotResult};
use crate::services::notifier::OperatorNotifier;
use crate::services::session::SessionStore;
use crate::services::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<MenuCatalog>,
    pub engine: ConversationEngine,
    pub sessions: SessionStore,
    pub store: Arc<dyn RecordStore>,
    pub notifier: OperatorNotifier,
}

static APP_STATE: OnceLock<AppState> = OnceLock::new();

impl AppState {
    pub fn new(config: AppConfig, bot: Bot, store: Arc<dyn RecordStore>) -> BotResult<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!("Loading menu catalog from {}", path);
                MenuCatalog::from_path(path)?
            }
            None => MenuCatalog::default(),
        };
        let catalog = Arc::new(catalog);

        let engine = ConversationEngine::new(Arc::clone(&catalog));
        let notifier = OperatorNotifier::new(bot, config.operator.chat_id);

        Ok(Self {
            config,
            catalog,
            engine,
            sessions: SessionStore::new(),
            store,
            notifier,
        })
    }

    pub fn set_global(state: AppState) -> BotResult<()> {
        APP_STATE
            .set(state)
            .map_err(|_| BotError::AppStateError("Failed to set global app state".into()))
    }

    pub fn get() -> BotResult<AppState> {
        APP_STATE
            .get()
            .cloned()
            .ok_or_else(|| BotError::AppStateError("App state not initialized".into()))
    }
}
