//! The conversation engine: a pure mapping from (state, inbound text) to
//! (next state, reply, side effects).
//!
//! Dispatch is an ordered first-match chain, re-evaluated on every message:
//! global menu shortcuts first, then the rules of the current state, then a
//! fixed "use the menu buttons" default. The engine never touches I/O; the
//! message handler executes the returned effects.

pub mod render;
pub mod state;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::catalog::{labels, MenuCatalog, MenuPage};

use render::texts;
use state::{
    EventDraft, EventField, EventRecord, ProviderDraft, RequestDraft, SessionState, SubmissionKind,
    SubmissionRecord, EVENT_DATE_FORMAT,
};

/// One inbound text message, with the sender identity needed for records.
#[derive(Clone, Debug)]
pub struct TurnInput {
    pub text: String,
    pub user_id: u64,
    pub display_name: String,
}

/// Outbound reply. `keyboard: None` leaves the user's previous keyboard up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<MenuPage>,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: MenuPage) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }
}

/// Side effects requested by a turn, executed by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Best-effort append to the submissions sheet; failure is logged and
    /// never blocks the confirmation.
    RecordSubmission(SubmissionRecord),
    /// Strict append to the events sheet; failure aborts the confirmation
    /// and any following operator notification.
    RecordEvent(EventRecord),
    NotifyOperator(String),
    /// Fetch and render events happening on the given date.
    ListEventsOn(NaiveDate),
    /// Fetch and render events from today onward.
    ListUpcomingEvents,
}

/// Result of one turn. `reply: None` means the caller renders the reply from
/// a query effect instead.
#[derive(Clone, Debug)]
pub struct Turn {
    pub next: SessionState,
    pub reply: Option<Reply>,
    pub effects: Vec<Effect>,
}

impl Turn {
    fn stay(state: &SessionState, reply: Reply) -> Self {
        Self {
            next: state.clone(),
            reply: Some(reply),
            effects: Vec::new(),
        }
    }

    fn go(next: SessionState, reply: Reply) -> Self {
        Self {
            next,
            reply: Some(reply),
            effects: Vec::new(),
        }
    }

    fn query(next: SessionState, effect: Effect) -> Self {
        Self {
            next,
            reply: None,
            effects: vec![effect],
        }
    }
}

#[derive(Clone)]
pub struct ConversationEngine {
    catalog: Arc<MenuCatalog>,
}

impl ConversationEngine {
    pub fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle_turn(&self, state: &SessionState, input: &TurnInput) -> Turn {
        let text = input.text.trim();

        // Global shortcuts escape any state; mid-form text that is not one of
        // these labels is form input, never a menu miss.
        match text {
            labels::FIND_SERVICE => return self.enter_city_search(),
            labels::BECOME_PROVIDER => return self.enter_provider_flow(),
            labels::EVENTS_BOARD => return self.enter_events_menu(),
            labels::SUPPORT => return Turn::stay(state, Reply::text_only(texts::SUPPORT)),
            labels::MAIN_MENU => return self.reset_to_main(texts::MAIN_MENU),
            _ => {}
        }

        match state {
            SessionState::Main => self.fallback(state),
            SessionState::ChoosingCityForSearch { page } => self.search_city_turn(state, *page, text),
            SessionState::ChoosingCategory { page, draft } => self.category_turn(state, *page, draft, text),
            SessionState::ChoosingPetService { draft } => self.pet_turn(state, draft, text),
            SessionState::EnteringRequestDetails { draft } => self.finish_request(draft, text, input),
            SessionState::AddingServiceSuggestion => self.finish_suggestion(text, input),
            SessionState::ProviderChoosingCity { page } => self.provider_city_turn(state, *page, text),
            SessionState::ProviderChoosingCategory { page, draft } => {
                self.provider_category_turn(state, *page, draft, text)
            }
            SessionState::ProviderEnteringName { draft } => {
                let mut draft = draft.clone();
                draft.name = Some(text.to_string());
                Turn::go(
                    SessionState::ProviderEnteringContact { draft },
                    Reply::text_only(texts::PROVIDER_ENTER_CONTACT),
                )
            }
            SessionState::ProviderEnteringContact { draft } => self.finish_provider(draft, text, input),
            SessionState::EventsMenu => self.events_menu_turn(state, text),
            SessionState::AwaitingEventsDate => self.events_date_turn(text),
            SessionState::AddingEvent { draft, field } => self.event_field_turn(state, draft, *field, text, input),
        }
    }

    // --- flow entry points -------------------------------------------------

    fn enter_city_search(&self) -> Turn {
        Turn::go(
            SessionState::ChoosingCityForSearch { page: 0 },
            Reply::new(texts::CHOOSE_CITY, self.city_page(0)),
        )
    }

    fn enter_provider_flow(&self) -> Turn {
        Turn::go(
            SessionState::ProviderChoosingCity { page: 0 },
            Reply::new(texts::CHOOSE_CITY, self.city_page(0)),
        )
    }

    fn enter_events_menu(&self) -> Turn {
        Turn::go(
            SessionState::EventsMenu,
            Reply::new(texts::EVENTS_MENU, self.catalog.events_menu()),
        )
    }

    fn reset_to_main(&self, text: &str) -> Turn {
        Turn::go(SessionState::Main, Reply::new(text, self.catalog.main_menu()))
    }

    /// No rule matched. In `Main` the menu keyboard is re-attached so a cold
    /// start always ends with the main menu on screen.
    fn fallback(&self, state: &SessionState) -> Turn {
        let reply = if matches!(state, SessionState::Main) {
            Reply::new(texts::USE_BUTTONS, self.catalog.main_menu())
        } else {
            Reply::text_only(texts::USE_BUTTONS)
        };
        Turn::stay(state, reply)
    }

    // --- find-a-service ----------------------------------------------------

    fn search_city_turn(&self, state: &SessionState, page: usize, text: &str) -> Turn {
        if let Some(page) = self.city_nav(page, text) {
            return Turn::go(
                SessionState::ChoosingCityForSearch { page },
                Reply::new(texts::CHOOSE_CITY, self.city_page(page)),
            );
        }
        if self.catalog.is_city(text) {
            let draft = RequestDraft {
                city: Some(text.to_string()),
                service: None,
            };
            return Turn::go(
                SessionState::ChoosingCategory { page: 0, draft },
                self.category_reply(0),
            );
        }
        self.fallback(state)
    }

    fn category_turn(&self, state: &SessionState, page: usize, draft: &RequestDraft, text: &str) -> Turn {
        if page > 0 && text == self.catalog.category_back_label(page) {
            return Turn::go(
                SessionState::ChoosingCategory {
                    page: page - 1,
                    draft: draft.clone(),
                },
                self.category_reply(page - 1),
            );
        }
        if text == self.catalog.category_forward_label(page) {
            return if page + 1 < self.catalog.category_page_count() {
                Turn::go(
                    SessionState::ChoosingCategory {
                        page: page + 1,
                        draft: draft.clone(),
                    },
                    self.category_reply(page + 1),
                )
            } else {
                // advertised but not built yet
                Turn::stay(state, Reply::text_only(texts::CATEGORY_PAGES_PENDING))
            };
        }
        if text == labels::BACK {
            // back row of the "no providers" reply returns to the grid
            return Turn::stay(state, self.category_reply(page));
        }
        if text == labels::ADD_MISSING {
            return Turn::go(
                SessionState::AddingServiceSuggestion,
                Reply::text_only(texts::SUGGEST_SERVICE),
            );
        }
        if self.catalog.is_pet_category(text) {
            return Turn::go(
                SessionState::ChoosingPetService { draft: draft.clone() },
                Reply::new(texts::CHOOSE_PET_SERVICE, self.catalog.pet_page()),
            );
        }
        if self.catalog.category_on_page(page, text) {
            return self.service_chosen(state, draft, text);
        }
        self.fallback(state)
    }

    fn pet_turn(&self, state: &SessionState, draft: &RequestDraft, text: &str) -> Turn {
        if text == labels::ADD_PET_SERVICE || text == labels::ADD_MISSING {
            return Turn::go(
                SessionState::AddingServiceSuggestion,
                Reply::text_only(texts::SUGGEST_SERVICE),
            );
        }
        if text == labels::BACK {
            return Turn::go(
                SessionState::ChoosingCategory {
                    page: 0,
                    draft: draft.clone(),
                },
                self.category_reply(0),
            );
        }
        if self.catalog.is_pet_service(text) {
            return self.service_chosen(state, draft, text);
        }
        self.fallback(state)
    }

    /// A known service label was picked: route into the request form when it
    /// has providers, otherwise answer with the fixed "no providers" reply.
    fn service_chosen(&self, state: &SessionState, draft: &RequestDraft, service: &str) -> Turn {
        if self.catalog.is_serviced(service) {
            let mut draft = draft.clone();
            draft.service = Some(service.to_string());
            Turn::go(
                SessionState::EnteringRequestDetails { draft },
                Reply::text_only(render::chose_service(service)),
            )
        } else {
            Turn::stay(
                state,
                Reply::new(
                    texts::NO_PROVIDERS,
                    MenuPage::new(vec![vec![labels::BACK.to_string(), labels::MAIN_MENU.to_string()]]),
                ),
            )
        }
    }

    fn finish_request(&self, draft: &RequestDraft, details: &str, input: &TurnInput) -> Turn {
        let service = draft.service.clone().unwrap_or_default();
        let record = SubmissionRecord {
            kind: SubmissionKind::Request,
            name: details.to_string(),
            city: draft.city.clone().unwrap_or_default(),
            service: service.clone(),
            user_id: input.user_id,
            display_name: input.display_name.clone(),
            contact: None,
        };

        Turn {
            next: SessionState::Main,
            reply: Some(Reply::new(texts::REQUEST_ACCEPTED, self.catalog.main_menu())),
            effects: vec![
                Effect::RecordSubmission(record),
                Effect::NotifyOperator(render::notify_request(
                    &service,
                    details,
                    &input.display_name,
                    input.user_id,
                )),
            ],
        }
    }

    fn finish_suggestion(&self, text: &str, input: &TurnInput) -> Turn {
        let record = SubmissionRecord {
            kind: SubmissionKind::Suggestion,
            name: text.to_string(),
            city: String::new(),
            service: String::new(),
            user_id: input.user_id,
            display_name: input.display_name.clone(),
            contact: None,
        };

        Turn {
            next: SessionState::Main,
            reply: Some(Reply::new(texts::SUGGESTION_ACCEPTED, self.catalog.main_menu())),
            effects: vec![
                Effect::RecordSubmission(record),
                Effect::NotifyOperator(render::notify_suggestion(text, &input.display_name, input.user_id)),
            ],
        }
    }

    // --- become-a-provider -------------------------------------------------

    fn provider_city_turn(&self, state: &SessionState, page: usize, text: &str) -> Turn {
        if let Some(page) = self.city_nav(page, text) {
            return Turn::go(
                SessionState::ProviderChoosingCity { page },
                Reply::new(texts::CHOOSE_CITY, self.city_page(page)),
            );
        }
        if self.catalog.is_city(text) {
            let draft = ProviderDraft {
                city: Some(text.to_string()),
                service: None,
                name: None,
            };
            return Turn::go(
                SessionState::ProviderChoosingCategory { page: 0, draft },
                Reply::new(render::city_chosen(text), self.category_keyboard(0)),
            );
        }
        self.fallback(state)
    }

    fn provider_category_turn(&self, state: &SessionState, page: usize, draft: &ProviderDraft, text: &str) -> Turn {
        if page > 0 && text == self.catalog.category_back_label(page) {
            return Turn::go(
                SessionState::ProviderChoosingCategory {
                    page: page - 1,
                    draft: draft.clone(),
                },
                Reply::new(texts::PROVIDER_CHOOSE_CATEGORY, self.category_keyboard(page - 1)),
            );
        }
        if text == self.catalog.category_forward_label(page) {
            return if page + 1 < self.catalog.category_page_count() {
                Turn::go(
                    SessionState::ProviderChoosingCategory {
                        page: page + 1,
                        draft: draft.clone(),
                    },
                    Reply::new(texts::PROVIDER_CHOOSE_CATEGORY, self.category_keyboard(page + 1)),
                )
            } else {
                Turn::stay(state, Reply::text_only(texts::CATEGORY_PAGES_PENDING))
            };
        }
        if text == labels::ADD_MISSING {
            return Turn::go(
                SessionState::AddingServiceSuggestion,
                Reply::text_only(texts::SUGGEST_SERVICE),
            );
        }
        if self.catalog.category_on_page(page, text) || self.catalog.is_pet_service(text) {
            let mut draft = draft.clone();
            draft.service = Some(text.to_string());
            return Turn::go(
                SessionState::ProviderEnteringName { draft },
                Reply::text_only(texts::PROVIDER_ENTER_NAME),
            );
        }
        self.fallback(state)
    }

    fn finish_provider(&self, draft: &ProviderDraft, contact: &str, input: &TurnInput) -> Turn {
        let name = draft.name.clone().unwrap_or_default();
        let city = draft.city.clone().unwrap_or_default();
        let service = draft.service.clone().unwrap_or_default();

        let record = SubmissionRecord {
            kind: SubmissionKind::Provider,
            name: name.clone(),
            city: city.clone(),
            service: service.clone(),
            user_id: input.user_id,
            display_name: input.display_name.clone(),
            contact: Some(contact.to_string()),
        };

        Turn {
            next: SessionState::Main,
            reply: Some(Reply::new(
                render::provider_registered(&name, &city),
                self.catalog.main_menu(),
            )),
            effects: vec![
                Effect::RecordSubmission(record),
                Effect::NotifyOperator(render::notify_provider(&name, &city, &service, input.user_id)),
            ],
        }
    }

    // --- events board ------------------------------------------------------

    fn events_menu_turn(&self, state: &SessionState, text: &str) -> Turn {
        match text {
            labels::EVENTS_UPCOMING => Turn::query(SessionState::EventsMenu, Effect::ListUpcomingEvents),
            labels::EVENTS_ON_DATE => Turn::go(
                SessionState::AwaitingEventsDate,
                Reply::text_only(texts::EVENTS_ASK_DATE),
            ),
            labels::EVENTS_ADD => Turn::go(
                SessionState::AddingEvent {
                    draft: EventDraft::default(),
                    field: EventField::Name,
                },
                Reply::text_only(texts::EVENT_ASK_NAME),
            ),
            _ => self.fallback(state),
        }
    }

    fn events_date_turn(&self, text: &str) -> Turn {
        match NaiveDate::parse_from_str(text, EVENT_DATE_FORMAT) {
            Ok(date) => Turn::query(SessionState::EventsMenu, Effect::ListEventsOn(date)),
            // no retry state: fall back to browsing
            Err(_) => Turn::go(SessionState::EventsMenu, Reply::text_only(texts::EVENTS_BAD_DATE)),
        }
    }

    fn event_field_turn(
        &self,
        state: &SessionState,
        draft: &EventDraft,
        field: EventField,
        text: &str,
        input: &TurnInput,
    ) -> Turn {
        let mut draft = draft.clone();
        let (next_field, prompt) = match field {
            EventField::Name => {
                draft.name = Some(text.to_string());
                (EventField::Date, Reply::text_only(texts::EVENT_ASK_DATE))
            }
            EventField::Date => match NaiveDate::parse_from_str(text, EVENT_DATE_FORMAT) {
                Ok(date) => {
                    draft.date = Some(date);
                    (EventField::Place, Reply::text_only(texts::EVENT_ASK_PLACE))
                }
                Err(_) => return Turn::stay(state, Reply::text_only(texts::EVENTS_BAD_DATE)),
            },
            EventField::Place => {
                draft.place = Some(text.to_string());
                (EventField::Description, Reply::text_only(texts::EVENT_ASK_DESCRIPTION))
            }
            EventField::Description => {
                draft.description = render::optional_field(text);
                (EventField::Link, Reply::text_only(texts::EVENT_ASK_LINK))
            }
            EventField::Link => {
                draft.link = render::optional_field(text);
                (
                    EventField::Category,
                    Reply::new(texts::EVENT_ASK_CATEGORY, self.catalog.event_category_page()),
                )
            }
            EventField::Category => {
                if !self.catalog.is_event_category(text) {
                    return Turn::stay(
                        state,
                        Reply::new(texts::EVENT_BAD_CATEGORY, self.catalog.event_category_page()),
                    );
                }
                return self.finish_event(&draft, text, input);
            }
        };

        Turn::go(
            SessionState::AddingEvent {
                draft,
                field: next_field,
            },
            prompt,
        )
    }

    fn finish_event(&self, draft: &EventDraft, category: &str, input: &TurnInput) -> Turn {
        // the date field is validated before it is stored
        let Some(date) = draft.date else {
            return self.reset_to_main(texts::USE_BUTTONS);
        };

        let record = EventRecord {
            name: draft.name.clone().unwrap_or_default(),
            date,
            place: draft.place.clone().unwrap_or_default(),
            description: draft.description.clone(),
            link: draft.link.clone(),
            category: category.to_string(),
        };

        let notice = render::notify_event(
            &record.name,
            &record.date.format(EVENT_DATE_FORMAT).to_string(),
            &record.place,
            &input.display_name,
            input.user_id,
        );

        Turn {
            next: SessionState::Main,
            reply: Some(Reply::new(texts::EVENT_ACCEPTED, self.catalog.main_menu())),
            effects: vec![Effect::RecordEvent(record), Effect::NotifyOperator(notice)],
        }
    }

    // --- helpers -----------------------------------------------------------

    /// City pager: returns the target page when `text` is a navigation label
    /// with an existing neighbor.
    fn city_nav(&self, page: usize, text: &str) -> Option<usize> {
        match text {
            labels::FORWARD if page + 1 < self.catalog.city_page_count() => Some(page + 1),
            labels::BACK if page > 0 => Some(page - 1),
            _ => None,
        }
    }

    fn city_page(&self, page: usize) -> MenuPage {
        self.catalog.city_page(page).unwrap_or_default()
    }

    fn category_keyboard(&self, page: usize) -> MenuPage {
        self.catalog.category_page(page).unwrap_or_default()
    }

    fn category_reply(&self, page: usize) -> Reply {
        let total = self
            .catalog
            .advertised_category_pages
            .max(self.catalog.category_page_count());
        Reply::new(render::category_page_title(page, total), self.category_keyboard(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ConversationEngine {
        ConversationEngine::new(Arc::new(MenuCatalog::default()))
    }

    fn input(text: &str) -> TurnInput {
        TurnInput {
            text: text.to_string(),
            user_id: 42,
            display_name: "@tester".to_string(),
        }
    }

    fn drive(engine: &ConversationEngine, start: SessionState, messages: &[&str]) -> (SessionState, Turn) {
        let mut state = start;
        let mut last = engine.handle_turn(&state, &input(messages[0]));
        state = last.next.clone();
        for text in &messages[1..] {
            last = engine.handle_turn(&state, &input(text));
            state = last.next.clone();
        }
        (state, last)
    }

    #[test]
    fn test_cold_start_shows_main_menu() {
        let engine = engine();
        // any content from a fresh Main session gets the menu reply
        for text in ["привет", "/unknown", "что умеешь?"] {
            let turn = engine.handle_turn(&SessionState::Main, &input(text));
            assert_eq!(turn.next, SessionState::Main);
            let reply = turn.reply.unwrap();
            assert_eq!(reply.text, texts::USE_BUTTONS);
            assert!(reply.keyboard.unwrap().contains(labels::FIND_SERVICE));
            assert!(turn.effects.is_empty());
        }
    }

    #[test]
    fn test_global_shortcuts_escape_every_state() {
        let engine = engine();
        let states = vec![
            SessionState::Main,
            SessionState::ChoosingCityForSearch { page: 1 },
            SessionState::ProviderEnteringName {
                draft: ProviderDraft::default(),
            },
            SessionState::AwaitingEventsDate,
            SessionState::AddingEvent {
                draft: EventDraft::default(),
                field: EventField::Place,
            },
        ];

        for state in &states {
            let turn = engine.handle_turn(state, &input(labels::MAIN_MENU));
            assert_eq!(turn.next, SessionState::Main, "main menu from {:?}", state);

            let turn = engine.handle_turn(state, &input(labels::FIND_SERVICE));
            assert_eq!(turn.next, SessionState::ChoosingCityForSearch { page: 0 });

            let turn = engine.handle_turn(state, &input(labels::BECOME_PROVIDER));
            assert_eq!(turn.next, SessionState::ProviderChoosingCity { page: 0 });

            let turn = engine.handle_turn(state, &input(labels::EVENTS_BOARD));
            assert_eq!(turn.next, SessionState::EventsMenu);
        }
    }

    #[test]
    fn test_support_replies_without_state_change() {
        let engine = engine();
        let state = SessionState::ChoosingCityForSearch { page: 0 };
        let turn = engine.handle_turn(&state, &input(labels::SUPPORT));
        assert_eq!(turn.next, state);
        assert_eq!(turn.reply.unwrap().text, texts::SUPPORT);
    }

    #[test]
    fn test_provider_form_round_trip() {
        let engine = engine();
        let (state, turn) = drive(
            &engine,
            SessionState::Main,
            &[
                labels::BECOME_PROVIDER,
                "Находка",
                "🛁 Груминг",
                "Иван Петров",
                "+7 900 000-00-00",
            ],
        );

        assert_eq!(state, SessionState::Main);
        let reply = turn.reply.unwrap();
        assert!(reply.text.contains("Иван Петров"));
        assert!(reply.text.contains("Находка"));
        assert!(reply.keyboard.unwrap().contains(labels::FIND_SERVICE));

        let rows: Vec<_> = turn
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::RecordSubmission(r) => Some(r.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(rows.len(), 1, "exactly one submission record");
        assert_eq!(
            rows[0].clone().into_row(),
            vec![
                "Исполнитель",
                "Иван Петров",
                "Находка",
                "🛁 Груминг",
                "42",
                "@tester",
                "+7 900 000-00-00"
            ]
        );
        assert!(turn
            .effects
            .iter()
            .any(|e| matches!(e, Effect::NotifyOperator(text) if text.contains("Иван Петров"))));
    }

    #[test]
    fn test_browse_scenario_city_then_unserviced_category() {
        let engine = engine();

        // "🔍 Найти услугу" lists city page 1 with forward/main-menu rows
        let turn = engine.handle_turn(&SessionState::Main, &input(labels::FIND_SERVICE));
        assert_eq!(turn.next, SessionState::ChoosingCityForSearch { page: 0 });
        let keyboard = turn.reply.unwrap().keyboard.unwrap();
        assert!(keyboard.contains("Владивосток"));
        assert!(keyboard.contains(labels::FORWARD));
        assert!(keyboard.contains(labels::MAIN_MENU));

        // a city from the page moves to the category grid, city recorded
        let turn = engine.handle_turn(&turn.next, &input("Владивосток"));
        let SessionState::ChoosingCategory { page, ref draft } = turn.next else {
            panic!("expected category browsing, got {:?}", turn.next);
        };
        assert_eq!(page, 0);
        assert_eq!(draft.city.as_deref(), Some("Владивосток"));
        assert!(turn.reply.clone().unwrap().keyboard.unwrap().contains("🛋️ Мебель"));

        // an unserviced category gets the fixed reply, state unchanged
        let browsing = turn.next.clone();
        let turn = engine.handle_turn(&browsing, &input("🛋️ Мебель"));
        assert_eq!(turn.next, browsing);
        let reply = turn.reply.unwrap();
        assert_eq!(reply.text, texts::NO_PROVIDERS);
        let keyboard = reply.keyboard.unwrap();
        assert!(keyboard.contains(labels::BACK));
        assert!(keyboard.contains(labels::MAIN_MENU));

        // the main-menu label resets everything
        let turn = engine.handle_turn(&browsing, &input(labels::MAIN_MENU));
        assert_eq!(turn.next, SessionState::Main);
    }

    #[test]
    fn test_pet_request_round_trip() {
        let engine = engine();
        let (state, turn) = drive(
            &engine,
            SessionState::Main,
            &[
                labels::FIND_SERVICE,
                "Артём",
                "🐾 Животные",
                "🛁 Груминг",
                "Подстричь пуделя, в субботу",
            ],
        );

        assert_eq!(state, SessionState::Main);
        assert_eq!(turn.reply.unwrap().text, texts::REQUEST_ACCEPTED);

        let record = turn
            .effects
            .iter()
            .find_map(|e| match e {
                Effect::RecordSubmission(r) => Some(r.clone()),
                _ => None,
            })
            .expect("request record");
        assert_eq!(record.kind, SubmissionKind::Request);
        assert_eq!(record.city.as_str(), "Артём");
        assert_eq!(record.service.as_str(), "🛁 Груминг");
        assert_eq!(record.name.as_str(), "Подстричь пуделя, в субботу");
    }

    #[test]
    fn test_service_suggestion_flow() {
        let engine = engine();
        let state = SessionState::ChoosingCategory {
            page: 0,
            draft: RequestDraft::default(),
        };

        let turn = engine.handle_turn(&state, &input(labels::ADD_MISSING));
        assert_eq!(turn.next, SessionState::AddingServiceSuggestion);

        let turn = engine.handle_turn(&turn.next, &input("Выгул альпак"));
        assert_eq!(turn.next, SessionState::Main);
        assert_eq!(turn.reply.unwrap().text, texts::SUGGESTION_ACCEPTED);
        assert!(turn.effects.iter().any(|e| matches!(
            e,
            Effect::RecordSubmission(r) if r.kind == SubmissionKind::Suggestion && r.name == "Выгул альпак"
        )));
    }

    #[test]
    fn test_provider_category_add_missing_opens_suggestion() {
        let engine = engine();
        let state = SessionState::ProviderChoosingCategory {
            page: 0,
            draft: ProviderDraft::default(),
        };

        // the provider grid shows the "add missing" row, so it must act
        let grid = engine.handle_turn(&SessionState::ProviderChoosingCity { page: 0 }, &input("Находка"));
        assert!(grid.reply.unwrap().keyboard.unwrap().contains(labels::ADD_MISSING));

        let turn = engine.handle_turn(&state, &input(labels::ADD_MISSING));
        assert_eq!(turn.next, SessionState::AddingServiceSuggestion);
        assert_eq!(turn.reply.unwrap().text, texts::SUGGEST_SERVICE);
    }

    #[test]
    fn test_category_pager() {
        let engine = engine();
        let state = SessionState::ChoosingCategory {
            page: 0,
            draft: RequestDraft::default(),
        };

        let turn = engine.handle_turn(&state, &input("➡️ 2/4"));
        assert!(matches!(turn.next, SessionState::ChoosingCategory { page: 1, .. }));

        // page 3 is advertised but not built yet
        let turn = engine.handle_turn(&turn.next, &input("➡️ 3/4"));
        assert!(matches!(turn.next, SessionState::ChoosingCategory { page: 1, .. }));
        assert_eq!(turn.reply.unwrap().text, texts::CATEGORY_PAGES_PENDING);
    }

    #[test]
    fn test_city_pagination_navigation() {
        let engine = engine();
        let state = SessionState::ChoosingCityForSearch { page: 0 };

        // back has no neighbor on the first page
        let turn = engine.handle_turn(&state, &input(labels::BACK));
        assert_eq!(turn.next, state);
        assert_eq!(turn.reply.unwrap().text, texts::USE_BUTTONS);

        let turn = engine.handle_turn(&state, &input(labels::FORWARD));
        assert_eq!(turn.next, SessionState::ChoosingCityForSearch { page: 1 });

        let turn = engine.handle_turn(&turn.next, &input(labels::BACK));
        assert_eq!(turn.next, SessionState::ChoosingCityForSearch { page: 0 });
    }

    #[test]
    fn test_date_filter_rejects_invalid_calendar_date() {
        let engine = engine();

        let turn = engine.handle_turn(&SessionState::AwaitingEventsDate, &input("2024-02-30"));
        assert_eq!(turn.next, SessionState::EventsMenu);
        assert_eq!(turn.reply.unwrap().text, texts::EVENTS_BAD_DATE);
        assert!(turn.effects.is_empty(), "no store query on a bad date");

        let turn = engine.handle_turn(&SessionState::AwaitingEventsDate, &input("2026-09-12"));
        assert_eq!(turn.next, SessionState::EventsMenu);
        assert!(turn.reply.is_none());
        assert_eq!(
            turn.effects,
            vec![Effect::ListEventsOn(NaiveDate::from_ymd_opt(2026, 9, 12).unwrap())]
        );
    }

    #[test]
    fn test_event_creation_round_trip() {
        let engine = engine();
        let (state, turn) = drive(
            &engine,
            SessionState::EventsMenu,
            &[
                labels::EVENTS_ADD,
                "Фестиваль мидий",
                "2026-09-12",
                "Владивосток, набережная",
                "-",
                "https://example.com",
                "🎉 Фестивали",
            ],
        );

        assert_eq!(state, SessionState::Main);
        assert_eq!(turn.reply.unwrap().text, texts::EVENT_ACCEPTED);

        let record = turn
            .effects
            .iter()
            .find_map(|e| match e {
                Effect::RecordEvent(r) => Some(r.clone()),
                _ => None,
            })
            .expect("event record");
        assert_eq!(record.name, "Фестиваль мидий");
        assert_eq!(record.description, None);
        assert_eq!(record.link.as_deref(), Some("https://example.com"));
        assert_eq!(record.category, "🎉 Фестивали");
    }

    #[test]
    fn test_event_date_field_reprompts_on_bad_input() {
        let engine = engine();
        let state = SessionState::AddingEvent {
            draft: EventDraft {
                name: Some("Лекция".to_string()),
                ..Default::default()
            },
            field: EventField::Date,
        };

        let turn = engine.handle_turn(&state, &input("12 сентября"));
        assert_eq!(turn.next, state, "bad date must not advance the form");
        assert_eq!(turn.reply.unwrap().text, texts::EVENTS_BAD_DATE);
    }

    #[test]
    fn test_event_category_must_come_from_keyboard() {
        let engine = engine();
        let state = SessionState::AddingEvent {
            draft: EventDraft {
                name: Some("Лекция".to_string()),
                date: NaiveDate::from_ymd_opt(2026, 9, 12),
                place: Some("Находка".to_string()),
                ..Default::default()
            },
            field: EventField::Category,
        };

        let turn = engine.handle_turn(&state, &input("какая-то категория"));
        assert_eq!(turn.next, state);
        assert_eq!(turn.reply.unwrap().text, texts::EVENT_BAD_CATEGORY);
        assert!(turn.effects.is_empty());
    }

    #[test]
    fn test_upcoming_events_is_a_query() {
        let engine = engine();
        let turn = engine.handle_turn(&SessionState::EventsMenu, &input(labels::EVENTS_UPCOMING));
        assert_eq!(turn.next, SessionState::EventsMenu);
        assert!(turn.reply.is_none());
        assert_eq!(turn.effects, vec![Effect::ListUpcomingEvents]);
    }

    #[test]
    fn test_back_does_not_clear_draft() {
        let engine = engine();
        let draft = RequestDraft {
            city: Some("Находка".to_string()),
            service: None,
        };
        let state = SessionState::ChoosingPetService { draft: draft.clone() };

        let turn = engine.handle_turn(&state, &input(labels::BACK));
        let SessionState::ChoosingCategory { draft: kept, .. } = turn.next else {
            panic!("expected category browsing");
        };
        assert_eq!(kept, draft);
    }
}
