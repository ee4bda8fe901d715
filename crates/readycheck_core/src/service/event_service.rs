//! Preparation calendar use-case service.
//!
//! # Responsibility
//! - Manage milestone create/delete and the calendar's month and upcoming
//!   views.

use crate::model::event::{CalendarEvent, EventId, EventKind};
use crate::repo::event_repo::{EventRepoError, EventRepository};
use chrono::{NaiveDate, NaiveTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for adding a milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub kind: EventKind,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

/// Errors from calendar use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    /// Title is blank after trim.
    InvalidTitle,
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Persistence-layer failure.
    Repo(EventRepoError),
    /// Internal mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "event title must not be blank"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent event state: {details}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventRepoError> for EventServiceError {
    fn from(value: EventRepoError) -> Self {
        match value {
            EventRepoError::NotFound(id) => Self::EventNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Calendar service facade over repository implementations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one milestone to the calendar.
    pub fn add_event(&self, draft: &EventDraft) -> Result<CalendarEvent, EventServiceError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(EventServiceError::InvalidTitle);
        }

        let mut event = CalendarEvent::new(title, draft.kind, draft.date);
        event.description = draft.description.clone();
        event.time = draft.time;

        let id = self.repo.create_event(&event)?;
        self.repo
            .get_event(id)?
            .ok_or(EventServiceError::InconsistentState(
                "created event missing on read-back",
            ))
    }

    /// Removes one milestone permanently.
    pub fn remove_event(&self, id: EventId) -> Result<(), EventServiceError> {
        self.repo.delete_event(id).map_err(Into::into)
    }

    /// Every milestone, date ascending.
    pub fn list_events(&self) -> Result<Vec<CalendarEvent>, EventServiceError> {
        Ok(self.repo.list_events()?)
    }

    /// Milestones within one calendar month.
    pub fn month_events(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarEvent>, EventServiceError> {
        Ok(self.repo.list_month(year, month)?)
    }

    /// The next milestones on or after `today`, capped at `limit`.
    pub fn upcoming_events(
        &self,
        today: NaiveDate,
        limit: usize,
    ) -> Result<Vec<CalendarEvent>, EventServiceError> {
        let events = self.repo.list_events()?;
        Ok(events
            .into_iter()
            .filter(|event| event.date >= today)
            .take(limit)
            .collect())
    }
}
