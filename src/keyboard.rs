use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::catalog::MenuPage;

/// Renders a menu page as a reply keyboard, preserving its row layout.
pub fn reply_markup(page: &MenuPage) -> KeyboardMarkup {
    let rows = page
        .rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect::<Vec<_>>());

    KeyboardMarkup::new(rows).resize_keyboard()
}
