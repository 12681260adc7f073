use chrono::Utc;
use teloxide::prelude::*;

use crate::commands::Command;
use crate::engine::render::texts;
use crate::engine::state::SessionState;
use crate::error::HandlerResult;
use crate::keyboard;
use crate::state::AppState;

pub async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> HandlerResult<()> {
    let state = AppState::get()?;

    match cmd {
        Command::Start => {
            // /start always lands on a clean main menu
            if let Some(user) = &msg.from {
                let entry = state.sessions.get_or_create(user.id.0);
                let mut session = entry.lock().await;
                session.state = SessionState::Main;
                session.last_seen = Utc::now();
            }

            bot.send_message(msg.chat.id, texts::WELCOME)
                .reply_markup(keyboard::reply_markup(&state.catalog.main_menu()))
                .await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, texts::HELP)
                .reply_markup(keyboard::reply_markup(&state.catalog.main_menu()))
                .await?;
        }
    }

    Ok(())
}
