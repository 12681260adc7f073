use std::sync::{Arc, Once};

use teloxide::Bot;
use teloxide_tests::{MockBot, MockMessageText};

use crate::catalog::labels;
use crate::config::{
    AppConfig, OperatorConfig, SessionConfig, SheetsConfig, TelegramConfig, WebhookConfig,
};
use crate::engine::render::texts;
use crate::handlers::handler_tree;
use crate::services::store::{MemoryStore, RecordStore};
use crate::state::AppState;

pub fn test_config() -> AppConfig {
    AppConfig {
        telegram: TelegramConfig("123456:TEST".to_string()),
        operator: OperatorConfig { chat_id: None },
        sheets: SheetsConfig {
            spreadsheet_id: "test-spreadsheet".to_string(),
            api_token: "test-token".to_string(),
            submissions_sheet: "Заявки".to_string(),
            events_sheet: "Афиша".to_string(),
        },
        session: SessionConfig {
            idle_ttl_secs: 24 * 60 * 60,
            sweep_interval_secs: 60 * 60,
        },
        webhook: WebhookConfig { host: None, port: 10000 },
        catalog_path: None,
    }
}

pub fn test_state(store: Arc<dyn RecordStore>) -> AppState {
    AppState::new(test_config(), Bot::new("123456:TEST"), store).unwrap()
}

static INIT: Once = Once::new();

pub fn setup_global_state() {
    INIT.call_once(|| {
        AppState::set_global(test_state(Arc::new(MemoryStore::new()))).unwrap();
    });
}

async fn last_reply(text: &str) -> Option<String> {
    let bot = MockBot::new(MockMessageText::new().text(text), handler_tree());
    bot.dispatch().await;
    let responses = bot.get_responses();
    responses.sent_messages.last().and_then(|m| m.text().map(String::from))
}

#[tokio::test]
async fn test_start_command() {
    setup_global_state();
    assert_eq!(last_reply("/start").await.as_deref(), Some(texts::WELCOME));
}

#[tokio::test]
async fn test_help_command() {
    setup_global_state();
    assert_eq!(last_reply("/help").await.as_deref(), Some(texts::HELP));
}

#[tokio::test]
async fn test_support_button() {
    setup_global_state();
    assert_eq!(last_reply(labels::SUPPORT).await.as_deref(), Some(texts::SUPPORT));
}

#[tokio::test]
async fn test_free_text_falls_back_to_menu_prompt() {
    setup_global_state();
    assert_eq!(last_reply("привет").await.as_deref(), Some(texts::USE_BUTTONS));
}

#[tokio::test]
async fn test_find_service_button_asks_for_city() {
    setup_global_state();
    assert_eq!(
        last_reply(labels::FIND_SERVICE).await.as_deref(),
        Some(texts::CHOOSE_CITY)
    );
}
