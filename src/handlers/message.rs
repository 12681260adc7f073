//! The message endpoint: one engine turn per inbound text, then the side
//! effects with their per-effect failure policy.

use chrono::{NaiveDate, Utc};
use teloxide::prelude::*;
use teloxide::types::User;

use crate::engine::render::{self, texts};
use crate::engine::state::EventRecord;
use crate::engine::{Effect, Reply, TurnInput};
use crate::error::HandlerResult;
use crate::keyboard;
use crate::state::AppState;

pub async fn handle_message(bot: Bot, msg: Message) -> HandlerResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    let state = AppState::get()?;

    let input = TurnInput {
        text: text.to_string(),
        user_id: user.id.0,
        display_name: display_name(&user),
    };

    // The lock spans the whole turn, so a user's messages are handled in
    // arrival order.
    let entry = state.sessions.get_or_create(user.id.0);
    let mut session = entry.lock().await;

    let turn = state.engine.handle_turn(&session.state, &input);
    let reply = execute_effects(&state, &turn.effects).await.or(turn.reply);

    // commit before the send: a failed delivery must not leave the session
    // behind the effects that already ran
    session.state = turn.next;
    session.last_seen = Utc::now();

    if let Some(reply) = reply {
        let mut request = bot.send_message(msg.chat.id, reply.text);
        if let Some(page) = &reply.keyboard {
            request = request.reply_markup(keyboard::reply_markup(page));
        }
        request.await?;
    }

    Ok(())
}

fn display_name(user: &User) -> String {
    user.username
        .as_ref()
        .map(|username| format!("@{}", username))
        .unwrap_or_else(|| user.full_name())
}

/// Runs the turn's effects in order. Returns a reply that replaces the
/// engine's one: query effects always produce it, a failed event write
/// produces the failure notice (and suppresses the operator notification).
/// Submission writes and notifications stay best-effort.
async fn execute_effects(state: &AppState, effects: &[Effect]) -> Option<Reply> {
    let mut replacement = None;
    let mut skip_notifications = false;

    for effect in effects {
        match effect {
            Effect::RecordSubmission(record) => {
                let sheet = &state.config.sheets.submissions_sheet;
                if let Err(e) = state.store.append_row(sheet, record.clone().into_row()).await {
                    error!("Failed to record submission: {}", e);
                }
            }
            Effect::RecordEvent(record) => {
                let sheet = &state.config.sheets.events_sheet;
                if let Err(e) = state.store.append_row(sheet, record.clone().into_row()).await {
                    error!("Failed to record event: {}", e);
                    replacement = Some(Reply::new(texts::EVENT_SAVE_FAILED, state.catalog.main_menu()));
                    skip_notifications = true;
                }
            }
            Effect::NotifyOperator(text) => {
                if !skip_notifications {
                    state.notifier.notify(text).await;
                }
            }
            Effect::ListEventsOn(date) => {
                replacement = Some(Reply::text_only(list_events(state, Some(*date)).await));
            }
            Effect::ListUpcomingEvents => {
                replacement = Some(Reply::text_only(list_events(state, None).await));
            }
        }
    }

    replacement
}

/// Fetches the events sheet and renders the matching events: those on `on`
/// when given, otherwise everything from today onward.
async fn list_events(state: &AppState, on: Option<NaiveDate>) -> String {
    let rows = match state.store.list_rows(&state.config.sheets.events_sheet).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to load events: {}", e);
            return texts::EVENTS_FETCH_FAILED.to_string();
        }
    };

    // header and malformed rows parse to None and drop out here
    let mut events: Vec<EventRecord> = rows.iter().filter_map(|row| EventRecord::from_row(row)).collect();
    let today = Utc::now().date_naive();
    events.retain(|event| match on {
        Some(date) => event.date == date,
        None => event.date >= today,
    });
    events.sort_by_key(|event| event.date);

    render::render_events(&events)
}
