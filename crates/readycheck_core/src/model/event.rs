//! Preparation calendar milestone model.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable event identifier.
pub type EventId = Uuid;

/// Category of a preparation milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Preparation,
    Review,
    Inspection,
    Training,
    Meeting,
}

impl EventKind {
    /// Stable storage/wire encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preparation => "preparation",
            Self::Review => "review",
            Self::Inspection => "inspection",
            Self::Training => "training",
            Self::Meeting => "meeting",
        }
    }
}

/// Validation failures for calendar event state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventValidationError {
    /// Title is blank after trim.
    BlankTitle,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "event title must not be blank"),
        }
    }
}

impl Error for EventValidationError {}

/// One dated milestone on the preparation calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub kind: EventKind,
    pub date: NaiveDate,
    /// Optional start time; all-day milestones leave this unset.
    pub time: Option<NaiveTime>,
}

impl CalendarEvent {
    /// Creates an all-day milestone with a generated id.
    pub fn new(title: impl Into<String>, kind: EventKind, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            kind,
            date,
            time: None,
        }
    }

    /// Checks structural validity before persistence.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventValidationError::BlankTitle);
        }
        Ok(())
    }
}
