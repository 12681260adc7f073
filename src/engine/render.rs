//! Reply texts and the event-listing renderer. Pure formatting, no side
//! effects.

use crate::engine::state::{EventRecord, EVENT_DATE_FORMAT};

pub mod texts {
    pub const WELCOME: &str = "👋 Привет! Я бот PrimorService, ваш помощник по услугам во Владивостоке и Приморье!\n\nВыберите действие:";
    pub const HELP: &str = "ℹ️ Я помогаю найти услуги в Приморье.\n\n🔍 Найти услугу — подобрать исполнителя в вашем городе\n💼 Стать исполнителем — попасть в каталог\n🎟️ Афиша Приморья — события края\n📞 Поддержка — связаться с нами\n\n/start — начать сначала";
    pub const MAIN_MENU: &str = "Выберите действие:";
    pub const USE_BUTTONS: &str = "Пожалуйста, используйте кнопки меню.";
    pub const SUPPORT: &str = "Напишите нам: @dvsferra_support";

    pub const CHOOSE_CITY: &str = "Выберите ваш город:";
    pub const NO_PROVIDERS: &str = "❌ К сожалению, в данный момент нет доступных исполнителей для выбранной услуги в вашем городе.\n\n\
        💡 Попробуйте посмотреть в соседних городах — возможно, они есть там!\n\n\
        🤝 Давайте сделаем сервис лучше! Если вы знаете человека, который выполняет эту услугу, отправьте ему ссылку на бота (нажмите на имя бота вверху — ссылка скопируется).\n\n\
        🛠️ Если вы сами оказываете данную услугу, нажмите 'Стать исполнителем' в Главном Меню.";
    pub const CHOOSE_PET_SERVICE: &str = "Выберите конкретную услугу для животных:";
    pub const CATEGORY_PAGES_PENDING: &str = "📌 Пока доступны только 2 страницы. Добавлю больше в следующем обновлении!";
    pub const SUGGEST_SERVICE: &str = "📩 Укажите, какую услугу вы хотите добавить — мы рассмотрим её и включим в список!";
    pub const SUGGESTION_ACCEPTED: &str = "✅ Ваш запрос передан оператору. Если услуга будет добавлена — вы получите уведомление!";
    pub const REQUEST_ACCEPTED: &str = "✅ Ваша заявка принята! Мы свяжемся с вами в ближайшее время.";

    pub const PROVIDER_CHOOSE_CATEGORY: &str = "В какой сфере вы работаете?";
    pub const PROVIDER_ENTER_NAME: &str = "Введите ваше имя или название компании:";
    pub const PROVIDER_ENTER_CONTACT: &str = "Оставьте контакт для связи (телефон или @username):";

    pub const EVENTS_MENU: &str = "🎉 Афиша Приморья\n\nСмотрите ближайшие события, ищите по дате или добавьте своё!";
    pub const EVENTS_ASK_DATE: &str = "Введите дату в формате ГГГГ-ММ-ДД, например 2026-09-12:";
    pub const EVENTS_BAD_DATE: &str = "⚠️ Не удалось разобрать дату. Нужен формат ГГГГ-ММ-ДД, например 2026-09-12.";
    pub const EVENTS_FETCH_FAILED: &str = "⚠️ Не удалось загрузить события. Попробуйте позже.";
    pub const NO_EVENTS: &str = "😔 Событий не найдено. Загляните позже!";

    pub const EVENT_ASK_NAME: &str = "Как называется событие?";
    pub const EVENT_ASK_DATE: &str = "Когда оно пройдёт? Укажите дату в формате ГГГГ-ММ-ДД:";
    pub const EVENT_ASK_PLACE: &str = "Где оно пройдёт? Укажите город и место:";
    pub const EVENT_ASK_DESCRIPTION: &str = "Коротко опишите событие (или отправьте «-», чтобы пропустить):";
    pub const EVENT_ASK_LINK: &str = "Ссылка на событие (или «-», чтобы пропустить):";
    pub const EVENT_ASK_CATEGORY: &str = "Выберите категорию события:";
    pub const EVENT_BAD_CATEGORY: &str = "Пожалуйста, выберите категорию кнопкой ниже.";
    pub const EVENT_ACCEPTED: &str = "✅ Событие добавлено в афишу! Спасибо!";
    pub const EVENT_SAVE_FAILED: &str = "⚠️ Не удалось сохранить событие. Попробуйте позже.";
}

/// Skippable free-text fields accept "-" as an explicit empty answer.
pub fn optional_field(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

const MAX_RENDERED_EVENTS: usize = 5;

/// Renders up to five events, one field per line, optional fields omitted.
pub fn render_events(events: &[EventRecord]) -> String {
    if events.is_empty() {
        return texts::NO_EVENTS.to_string();
    }

    let mut blocks = Vec::new();
    for event in events.iter().take(MAX_RENDERED_EVENTS) {
        let mut lines = vec![
            format!("📍 {}", event.place),
            format!("📅 {}", event.date.format(EVENT_DATE_FORMAT)),
            format!("🎫 {}", event.name),
        ];
        if let Some(link) = &event.link {
            lines.push(format!("🔗 {}", link));
        }
        if let Some(description) = &event.description {
            lines.push(format!("📝 {}", description));
        }
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

/// Operator notification for a new provider registration.
pub fn notify_provider(name: &str, city: &str, service: &str, user_id: u64) -> String {
    format!(
        "🆕 Новый исполнитель!\nИмя: {}\nГород: {}\nУслуга: {}\nID: {}",
        name, city, service, user_id
    )
}

/// Operator notification for a new service request.
pub fn notify_request(service: &str, details: &str, display_name: &str, user_id: u64) -> String {
    format!(
        "📥 Новая заявка!\nУслуга: {}\nДетали: {}\nКлиент: {} (ID: {})",
        service, details, display_name, user_id
    )
}

/// Operator notification for a suggested service.
pub fn notify_suggestion(service: &str, display_name: &str, user_id: u64) -> String {
    format!(
        "📌 Запрос на добавление услуги:\n{}\nОт пользователя: {} (ID: {})",
        service, display_name, user_id
    )
}

/// Operator notification for a new event listing.
pub fn notify_event(name: &str, date: &str, place: &str, display_name: &str, user_id: u64) -> String {
    format!(
        "🎟️ Новое событие в афише!\n{} — {} — {}\nОт пользователя: {} (ID: {})",
        name, date, place, display_name, user_id
    )
}

/// Confirmation shown to a freshly registered provider.
pub fn provider_registered(name: &str, city: &str) -> String {
    format!(
        "✅ Спасибо, {}! Вы зарегистрированы как исполнитель в городе {}.\n\n\
        Ваш профиль добавлен в каталог. Мы свяжемся с вами для подтверждения.",
        name, city
    )
}

pub fn chose_service(service: &str) -> String {
    format!("Вы выбрали: {}\n\nНапишите подробности (адрес, дата, пожелания):", service)
}

pub fn city_chosen(city: &str) -> String {
    format!("Город: {}\n\n{}", city, texts::PROVIDER_CHOOSE_CATEGORY)
}

pub fn category_page_title(page: usize, total: usize) -> String {
    format!("Выберите категорию услуг ({}/{}):", page + 1, total)
}
