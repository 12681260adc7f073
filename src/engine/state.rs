//! Conversation state and the records a completed flow produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Position in the conversation. One value per user; `Main` is both the
/// initial state and the universal reset target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Main,
    // find-a-service flow
    ChoosingCityForSearch {
        page: usize,
    },
    ChoosingCategory {
        page: usize,
        draft: RequestDraft,
    },
    ChoosingPetService {
        draft: RequestDraft,
    },
    EnteringRequestDetails {
        draft: RequestDraft,
    },
    AddingServiceSuggestion,
    // become-a-provider flow
    ProviderChoosingCity {
        page: usize,
    },
    ProviderChoosingCategory {
        page: usize,
        draft: ProviderDraft,
    },
    ProviderEnteringName {
        draft: ProviderDraft,
    },
    ProviderEnteringContact {
        draft: ProviderDraft,
    },
    // events board
    EventsMenu,
    AwaitingEventsDate,
    AddingEvent {
        draft: EventDraft,
        field: EventField,
    },
}

/// Service request being assembled while browsing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDraft {
    pub city: Option<String>,
    pub service: Option<String>,
}

/// Provider registration form, filled field by field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDraft {
    pub city: Option<String>,
    pub service: Option<String>,
    pub name: Option<String>,
}

/// Event listing form, filled field by field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub place: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Which event field is being captured next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventField {
    Name,
    Date,
    Place,
    Description,
    Link,
    Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionKind {
    Provider,
    Request,
    Suggestion,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Provider => "Исполнитель",
            SubmissionKind::Request => "Заявка",
            SubmissionKind::Suggestion => "Предложение услуги",
        }
    }
}

/// A completed submission, destined for the submissions sheet.
/// Column order is fixed: kind, name, city, service, user id, display name,
/// contact (empty when not collected).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub kind: SubmissionKind,
    pub name: String,
    pub city: String,
    pub service: String,
    pub user_id: u64,
    pub display_name: String,
    pub contact: Option<String>,
}

impl SubmissionRecord {
    pub fn into_row(self) -> Vec<String> {
        vec![
            self.kind.as_str().to_string(),
            self.name,
            self.city,
            self.service,
            self.user_id.to_string(),
            self.display_name,
            self.contact.unwrap_or_default(),
        ]
    }
}

/// A completed event listing, destined for the events sheet.
/// Column order is fixed: name, date, place, description, link, category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub name: String,
    pub date: NaiveDate,
    pub place: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub category: String,
}

pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

impl EventRecord {
    pub fn into_row(self) -> Vec<String> {
        vec![
            self.name,
            self.date.format(EVENT_DATE_FORMAT).to_string(),
            self.place,
            self.description.unwrap_or_default(),
            self.link.unwrap_or_default(),
            self.category,
        ]
    }

    /// Parses a sheet row back into an event. Rows with a missing or
    /// unparseable date are not events and yield `None`.
    pub fn from_row(row: &[String]) -> Option<Self> {
        let name = row.first()?.trim();
        let date = NaiveDate::parse_from_str(row.get(1)?.trim(), EVENT_DATE_FORMAT).ok()?;
        let place = row.get(2)?.trim();
        if name.is_empty() || place.is_empty() {
            return None;
        }

        let non_empty = |s: &String| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        Some(Self {
            name: name.to_string(),
            date,
            place: place.to_string(),
            description: row.get(3).and_then(non_empty),
            link: row.get(4).and_then(non_empty),
            category: row.get(5).map(|s| s.trim().to_string()).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_row_order() {
        let record = SubmissionRecord {
            kind: SubmissionKind::Provider,
            name: "Иван".to_string(),
            city: "Находка".to_string(),
            service: "🛁 Груминг".to_string(),
            user_id: 42,
            display_name: "@ivan".to_string(),
            contact: Some("+7 900 000-00-00".to_string()),
        };

        assert_eq!(
            record.into_row(),
            vec!["Исполнитель", "Иван", "Находка", "🛁 Груминг", "42", "@ivan", "+7 900 000-00-00"]
        );
    }

    #[test]
    fn test_event_row_round_trip() {
        let record = EventRecord {
            name: "Фестиваль мидий".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            place: "Владивосток, набережная".to_string(),
            description: None,
            link: Some("https://example.com".to_string()),
            category: "🎉 Фестивали".to_string(),
        };

        let row = record.clone().into_row();
        assert_eq!(row[1], "2026-09-12");
        assert_eq!(row[3], ""); // omitted description stays an empty cell
        assert_eq!(EventRecord::from_row(&row), Some(record));
    }

    #[test]
    fn test_event_from_row_rejects_bad_rows() {
        let bad_date = vec!["x".to_string(), "12.09.2026".to_string(), "y".to_string()];
        assert_eq!(EventRecord::from_row(&bad_date), None);

        let header = vec!["Название".to_string(), "Дата".to_string(), "Место".to_string()];
        assert_eq!(EventRecord::from_row(&header), None);

        assert_eq!(EventRecord::from_row(&[]), None);
    }
}
