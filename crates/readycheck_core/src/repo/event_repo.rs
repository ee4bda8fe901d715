//! Calendar milestone repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Listings are ordered by `event_date ASC, event_time ASC, event_id ASC`
//!   so the calendar renders deterministically.
//! - Events are hard-deleted.

use crate::db::DbError;
use crate::model::event::{CalendarEvent, EventId, EventKind};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    event_id,
    title,
    description,
    kind,
    event_date,
    event_time
FROM events";

pub type EventRepoResult<T> = Result<T, EventRepoError>;

/// Errors from calendar event persistence and query operations.
#[derive(Debug)]
pub enum EventRepoError {
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
}

impl Display for EventRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
        }
    }
}

impl Error for EventRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for EventRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for EventRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for calendar milestones.
pub trait EventRepository {
    fn create_event(&self, event: &CalendarEvent) -> EventRepoResult<EventId>;
    fn get_event(&self, id: EventId) -> EventRepoResult<Option<CalendarEvent>>;
    fn delete_event(&self, id: EventId) -> EventRepoResult<()>;
    /// Every milestone, date ascending.
    fn list_events(&self) -> EventRepoResult<Vec<CalendarEvent>>;
    /// Milestones within one calendar month.
    fn list_month(&self, year: i32, month: u32) -> EventRepoResult<Vec<CalendarEvent>>;
}

/// SQLite-backed calendar event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &CalendarEvent) -> EventRepoResult<EventId> {
        self.conn.execute(
            "INSERT INTO events (
                event_id,
                title,
                description,
                kind,
                event_date,
                event_time
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                event.id.to_string(),
                event.title,
                event.description,
                event.kind.as_str(),
                event.date.format("%Y-%m-%d").to_string(),
                event.time.map(|time| time.format("%H:%M").to_string()),
            ],
        )?;

        Ok(event.id)
    }

    fn get_event(&self, id: EventId) -> EventRepoResult<Option<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE event_id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn delete_event(&self, id: EventId) -> EventRepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE event_id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(EventRepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_events(&self) -> EventRepoResult<Vec<CalendarEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             ORDER BY event_date ASC, event_time ASC, event_id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn list_month(&self, year: i32, month: u32) -> EventRepoResult<Vec<CalendarEvent>> {
        // Half-open range keeps the SQL free of per-month day arithmetic.
        let start = format!("{year:04}-{month:02}-01");
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = format!("{next_year:04}-{next_month:02}-01");

        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE event_date >= ?1
               AND event_date < ?2
             ORDER BY event_date ASC, event_time ASC, event_id ASC;"
        ))?;

        let mut rows = stmt.query([start, end])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }
}

fn parse_event_row(row: &Row<'_>) -> EventRepoResult<CalendarEvent> {
    let id_text: String = row.get("event_id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        EventRepoError::InvalidData(format!("invalid uuid `{id_text}` in events.event_id"))
    })?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_event_kind(&kind_text).ok_or_else(|| {
        EventRepoError::InvalidData(format!("invalid event kind `{kind_text}` in events.kind"))
    })?;

    let date_text: String = row.get("event_date")?;
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
        EventRepoError::InvalidData(format!("invalid date `{date_text}` in events.event_date"))
    })?;

    let time = match row.get::<_, Option<String>>("event_time")? {
        Some(value) => Some(NaiveTime::parse_from_str(&value, "%H:%M").map_err(|_| {
            EventRepoError::InvalidData(format!("invalid time `{value}` in events.event_time"))
        })?),
        None => None,
    };

    Ok(CalendarEvent {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        kind,
        date,
        time,
    })
}

fn parse_event_kind(value: &str) -> Option<EventKind> {
    match value {
        "preparation" => Some(EventKind::Preparation),
        "review" => Some(EventKind::Review),
        "inspection" => Some(EventKind::Inspection),
        "training" => Some(EventKind::Training),
        "meeting" => Some(EventKind::Meeting),
        _ => None,
    }
}
