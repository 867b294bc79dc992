// File: ./src/model/item.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Rendered as an empty status; calendar clients treat a missing STATUS as needs-action.
    #[default]
    NeedsAction,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NeedsAction => "",
            TaskStatus::InProgress => "IN-PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

// --- DATE TYPES ---

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DateType {
    /// `YYYY-MM-DD` with no time part.
    AllDay(NaiveDate),
    /// `YYYY-MM-DDTHH:MM[:SS]`; the input never carries a zone.
    Floating(NaiveDateTime),
    /// A clock reading.
    Specific(DateTime<Utc>),
}

impl DateType {
    /// iCalendar value text (RFC 5545 DATE / DATE-TIME).
    pub fn to_ical_value(&self) -> String {
        match self {
            DateType::AllDay(d) => d.format("%Y%m%d").to_string(),
            DateType::Floating(dt) => dt.format("%Y%m%dT%H%M%S").to_string(),
            DateType::Specific(dt) => dt.format("%Y%m%dT%H%M%SZ").to_string(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, DateType::AllDay(_))
    }

    /// Zone-less values are read as UTC, all-day ones at midnight.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            DateType::AllDay(d) => d.and_time(NaiveTime::MIN).and_utc(),
            DateType::Floating(dt) => dt.and_utc(),
            DateType::Specific(dt) => *dt,
        }
    }
}

/// One parsed task line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Hex SHA-256 of the untouched input line.
    pub uid: String,
    pub summary: String,
    pub status: TaskStatus,
    /// Upper-case `A`..=`Z`.
    pub priority: Option<char>,
    pub description: Option<String>,

    pub created: Option<DateType>,
    pub completed: Option<DateType>,
    pub due: Option<DateType>,
    pub start: Option<DateType>,
    pub dtstamp: DateType,

    /// `+project` markers and the `categories:` tag, sorted.
    pub categories: Vec<String>,
    /// `@context` markers, sorted.
    pub resources: Vec<String>,
    pub location: Option<String>,
}

impl Task {
    /// iCalendar PRIORITY for the todo.txt letter: A=1 .. H=8, anything later is 9.
    pub fn ical_priority(&self) -> Option<u32> {
        self.priority.map(|p| {
            let rank = (p as u32).saturating_sub('A' as u32) + 1;
            rank.min(9)
        })
    }
}
