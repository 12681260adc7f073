use teloxide::{macros::BotCommands, prelude::Requester, utils::command::BotCommands as _, Bot};

use crate::error::HandlerResult;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Запустить бота")]
    Start,
    #[command(description = "Как пользоваться ботом")]
    Help,
}

pub async fn setup_commands(bot: &Bot) -> HandlerResult<()> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
