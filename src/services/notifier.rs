//! Operator notifications. Best-effort by contract: a failed notification is
//! logged and never surfaced to the end user.

use teloxide::prelude::*;
use teloxide::types::ChatId;

#[derive(Clone)]
pub struct OperatorNotifier {
    bot: Bot,
    chat_id: Option<ChatId>,
}

impl OperatorNotifier {
    pub fn new(bot: Bot, chat_id: Option<ChatId>) -> Self {
        if chat_id.is_none() {
            warn!("No operator chat configured, notifications are disabled");
        }
        Self { bot, chat_id }
    }

    pub async fn notify(&self, text: &str) {
        let Some(chat_id) = self.chat_id else {
            return;
        };
        if let Err(e) = self.bot.send_message(chat_id, text).await {
            error!("Failed to notify operator: {}", e);
        }
    }
}
