mod commands;
mod message;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::commands::Command;

pub fn handler_tree() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry().branch(
        Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(commands::handle_command),
            )
            .endpoint(message::handle_message),
    )
}
