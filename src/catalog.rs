//! Static menu catalog: button labels, menu pages, city pagination.
//!
//! Everything here is data and pure transforms. The built-in catalog mirrors
//! the production menus, but the whole thing is serde-loadable so layout
//! variants stay configuration instead of forked dispatch code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BotError, BotResult};

/// Button labels the engine dispatches on. Kept apart from the catalog data
/// because these act as commands, not content.
pub mod labels {
    pub const FIND_SERVICE: &str = "🔍 Найти услугу";
    pub const BECOME_PROVIDER: &str = "💼 Стать исполнителем";
    pub const EVENTS_BOARD: &str = "🎟️ Афиша Приморья";
    pub const SUPPORT: &str = "📞 Поддержка";
    pub const MAIN_MENU: &str = "🏠 Главное меню";
    pub const BACK: &str = "⬅️ Назад";
    pub const FORWARD: &str = "➡️ Далее";
    pub const ADD_MISSING: &str = "➕ Нет нужного? - Добавьте";
    pub const ADD_PET_SERVICE: &str = "➕ Добавить услугу";
    pub const EVENTS_UPCOMING: &str = "📅 Ближайшие события";
    pub const EVENTS_ON_DATE: &str = "🗓️ События на дату";
    pub const EVENTS_ADD: &str = "➕ Добавить событие";
}

/// An ordered sequence of ordered rows of button labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPage {
    pub rows: Vec<Vec<String>>,
}

impl MenuPage {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.rows.iter().any(|row| row.iter().any(|l| l == label))
    }
}

/// Splits `items` into ordered chunks of at most `page_size` elements.
pub fn paginate<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    if page_size == 0 {
        return Vec::new();
    }
    items.chunks(page_size).map(|chunk| chunk.to_vec()).collect()
}

const CITY_PAGE_SIZE: usize = 6;
const GRID_COLUMNS: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MenuCatalog {
    /// Service category labels, page by page.
    pub category_pages: Vec<Vec<String>>,
    /// Total page count advertised in the pager labels. May exceed the pages
    /// that exist; stepping past the end gets a "coming soon" reply.
    pub advertised_category_pages: usize,
    /// Category label that opens the pet sub-menu instead of a provider
    /// lookup.
    pub pet_category: String,
    /// Sub-services shown for the pet category.
    pub pet_services: Vec<String>,
    /// Labels that currently have providers and route into the request form.
    /// Everything else gets the "no providers yet" reply.
    pub serviced: Vec<String>,
    pub cities: Vec<String>,
    pub event_categories: Vec<String>,
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self {
            category_pages: vec![
                vec![
                    "👶 Детские услуги".to_string(),
                    "💻 Для Бизнеса/IT".to_string(),
                    "🍔 Еда/Продукты".to_string(),
                    "🐾 Животные".to_string(),
                    "🧼 Клининг/Химчистка".to_string(),
                    "🛋️ Мебель".to_string(),
                    "🩺 Медицина/Врачи".to_string(),
                    "🎓 Обучение/Курсы".to_string(),
                ],
                vec![
                    "🚗 Авто/мото услуги".to_string(),
                    "🚌 Автобусы/Область".to_string(),
                    "⚖️ Адвокаты/Юристы".to_string(),
                    "🔑 Аренда/Прокат".to_string(),
                    "✂️ Ателье/Швея".to_string(),
                    "🔧 Быт.услуги/Ремонт".to_string(),
                    "🛍️ Бьюти Сфера".to_string(),
                    "🚚 Грузоперевозки".to_string(),
                ],
            ],
            advertised_category_pages: 4,
            pet_category: "🐾 Животные".to_string(),
            pet_services: vec![
                "🏥 Ветеринары".to_string(),
                "🛁 Груминг".to_string(),
                "🐶 Зооняни".to_string(),
                "🐱 Кинологи".to_string(),
                "📦 Передержка".to_string(),
            ],
            serviced: vec![
                "🏥 Ветеринары".to_string(),
                "🛁 Груминг".to_string(),
                "🐶 Зооняни".to_string(),
                "🐱 Кинологи".to_string(),
                "📦 Передержка".to_string(),
            ],
            cities: vec![
                "Владивосток".to_string(),
                "Находка".to_string(),
                "Артём".to_string(),
                "Уссурийск".to_string(),
                "Арсеньев".to_string(),
                "Большой Камень".to_string(),
                "Партизанск".to_string(),
                "Спасск-Дальний".to_string(),
                "Дальнегорск".to_string(),
                "Дальнереченск".to_string(),
                "Лесозаводск".to_string(),
                "Фокино".to_string(),
                "Славянка".to_string(),
                "Другой город Приморья".to_string(),
            ],
            event_categories: vec![
                "🎭 Концерты/Театр".to_string(),
                "🎨 Выставки".to_string(),
                "🏃 Спорт".to_string(),
                "🎉 Фестивали".to_string(),
                "👨‍👩‍👧 Для детей".to_string(),
                "📚 Другое".to_string(),
            ],
        }
    }
}

impl MenuCatalog {
    /// Loads a catalog override from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> BotResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| BotError::ConfigError(format!("Cannot read catalog file: {}", e)))?;
        serde_json::from_str(&raw).map_err(|e| BotError::ConfigError(format!("Malformed catalog file: {}", e)))
    }

    pub fn main_menu(&self) -> MenuPage {
        MenuPage::new(vec![
            vec![labels::FIND_SERVICE.to_string(), labels::BECOME_PROVIDER.to_string()],
            vec![labels::EVENTS_BOARD.to_string(), labels::SUPPORT.to_string()],
        ])
    }

    pub fn category_page_count(&self) -> usize {
        self.category_pages.len()
    }

    /// Category grid for `page` (0-based) with pager and "add" rows injected.
    pub fn category_page(&self, page: usize) -> Option<MenuPage> {
        let items = self.category_pages.get(page)?;
        let mut rows = grid(items, GRID_COLUMNS);

        let total = self.advertised_category_pages.max(self.category_pages.len());
        let mut pager = Vec::new();
        if page > 0 {
            pager.push(self.category_back_label(page));
        }
        if page + 1 < total {
            pager.push(self.category_forward_label(page));
        }
        if !pager.is_empty() {
            rows.push(pager);
        }
        rows.push(vec![labels::ADD_MISSING.to_string()]);

        Some(MenuPage::new(rows))
    }

    /// Pager label stepping back from `page`, e.g. "⬅️ 1/4" on page 2.
    pub fn category_back_label(&self, page: usize) -> String {
        let total = self.advertised_category_pages.max(self.category_pages.len());
        format!("⬅️ {}/{}", page, total)
    }

    /// Pager label stepping forward from `page`, e.g. "➡️ 2/4" on page 1.
    pub fn category_forward_label(&self, page: usize) -> String {
        let total = self.advertised_category_pages.max(self.category_pages.len());
        format!("➡️ {}/{}", page + 2, total)
    }

    /// True when `label` is a plain category on `page` (pager rows excluded).
    pub fn category_on_page(&self, page: usize, label: &str) -> bool {
        self.category_pages
            .get(page)
            .map(|items| items.iter().any(|l| l == label))
            .unwrap_or(false)
    }

    pub fn pet_page(&self) -> MenuPage {
        let mut rows = grid(&self.pet_services, GRID_COLUMNS);
        rows.push(vec![labels::ADD_PET_SERVICE.to_string()]);
        rows.push(vec![labels::BACK.to_string(), labels::MAIN_MENU.to_string()]);
        MenuPage::new(rows)
    }

    pub fn is_pet_category(&self, label: &str) -> bool {
        self.pet_category == label
    }

    pub fn is_pet_service(&self, label: &str) -> bool {
        self.pet_services.iter().any(|l| l == label)
    }

    pub fn is_serviced(&self, label: &str) -> bool {
        self.serviced.iter().any(|l| l == label)
    }

    pub fn is_city(&self, label: &str) -> bool {
        self.cities.iter().any(|l| l == label)
    }

    pub fn city_page_count(&self) -> usize {
        paginate(&self.cities, CITY_PAGE_SIZE).len()
    }

    /// City menu for `page` (0-based): one city per row, navigation rows only
    /// where a neighbor page exists, main-menu row always last.
    pub fn city_page(&self, page: usize) -> Option<MenuPage> {
        let pages = paginate(&self.cities, CITY_PAGE_SIZE);
        let items = pages.get(page)?;

        let mut rows: Vec<Vec<String>> = items.iter().map(|city| vec![city.clone()]).collect();

        let mut nav = Vec::new();
        if page > 0 {
            nav.push(labels::BACK.to_string());
        }
        if page + 1 < pages.len() {
            nav.push(labels::FORWARD.to_string());
        }
        if !nav.is_empty() {
            rows.push(nav);
        }
        rows.push(vec![labels::MAIN_MENU.to_string()]);

        Some(MenuPage::new(rows))
    }

    pub fn events_menu(&self) -> MenuPage {
        MenuPage::new(vec![
            vec![labels::EVENTS_UPCOMING.to_string(), labels::EVENTS_ON_DATE.to_string()],
            vec![labels::EVENTS_ADD.to_string()],
            vec![labels::MAIN_MENU.to_string()],
        ])
    }

    pub fn event_category_page(&self) -> MenuPage {
        let mut rows = grid(&self.event_categories, GRID_COLUMNS);
        rows.push(vec![labels::MAIN_MENU.to_string()]);
        MenuPage::new(rows)
    }

    pub fn is_event_category(&self, label: &str) -> bool {
        self.event_categories.iter().any(|l| l == label)
    }
}

fn grid(items: &[String], columns: usize) -> Vec<Vec<String>> {
    paginate(items, columns)
}
