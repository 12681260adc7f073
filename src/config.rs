use std::env;

use teloxide::types::ChatId;

use crate::error::{BotError, BotResult};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub operator: OperatorConfig,
    pub sheets: SheetsConfig,
    pub session: SessionConfig,
    pub webhook: WebhookConfig,
    /// Optional JSON file that replaces the built-in menu catalog.
    pub catalog_path: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TelegramConfig(pub String);

#[derive(Clone, Debug)]
pub struct OperatorConfig {
    /// Chat that receives new-submission notifications. Notifications are a
    /// no-op when unset.
    pub chat_id: Option<ChatId>,
}

#[derive(Clone, Debug)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_token: String,
    pub submissions_sheet: String,
    pub events_sheet: String,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WebhookConfig {
    /// Public hostname; long polling is used when unset.
    pub host: Option<String>,
    pub port: u16,
}

pub fn build_config() -> BotResult<AppConfig> {
    info!("Building AppConfig...");

    let config = AppConfig {
        telegram: TelegramConfig(required("TELEGRAM_BOT_TOKEN")?),
        operator: OperatorConfig {
            chat_id: optional("OPERATOR_CHAT_ID")
                .map(|raw| {
                    raw.parse::<i64>()
                        .map(ChatId)
                        .map_err(|_| BotError::ConfigError("Invalid OPERATOR_CHAT_ID".to_string()))
                })
                .transpose()?,
        },
        sheets: SheetsConfig {
            spreadsheet_id: required("SHEETS_SPREADSHEET_ID")?,
            api_token: required("SHEETS_API_TOKEN")?,
            submissions_sheet: optional("SHEETS_SUBMISSIONS_SHEET").unwrap_or_else(|| "Заявки".to_string()),
            events_sheet: optional("SHEETS_EVENTS_SHEET").unwrap_or_else(|| "Афиша".to_string()),
        },
        session: SessionConfig {
            idle_ttl_secs: parsed_or("SESSION_IDLE_TTL_SECS", 24 * 60 * 60)?,
            sweep_interval_secs: parsed_or("SESSION_SWEEP_INTERVAL_SECS", 60 * 60)?,
        },
        webhook: WebhookConfig {
            host: optional("WEBHOOK_HOST"),
            port: parsed_or("PORT", 10000)?,
        },
        catalog_path: optional("CATALOG_PATH"),
    };

    info!("AppConfig built");

    Ok(config)
}

fn required(key: &str) -> BotResult<String> {
    env::var(key).map_err(|_| BotError::ConfigError(format!("Missing {}", key)))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> BotResult<T> {
    match optional(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| BotError::ConfigError(format!("Invalid {}", key))),
        None => Ok(default),
    }
}
