//! Audit trail repository: status change log and daily progress snapshots.
//!
//! # Invariants
//! - Change-log entries are append-only; there is no update or delete path.
//! - `progress_history` keeps one row per calendar date; re-recording a date
//!   replaces the percentage and refreshes the recording time.

use crate::db::DbError;
use crate::model::audit::{ChangeLogEntry, ProgressSnapshot};
use crate::model::section::ItemStatus;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type AuditRepoResult<T> = Result<T, AuditRepoError>;

/// Errors from audit trail persistence and query operations.
#[derive(Debug)]
pub enum AuditRepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for AuditRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted audit data: {message}"),
        }
    }
}

impl Error for AuditRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for AuditRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for AuditRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the audit trail.
pub trait AuditRepository {
    /// Appends one status transition record.
    fn append_change(&self, entry: &ChangeLogEntry) -> AuditRepoResult<()>;
    /// Most recent transitions first, capped at `limit`.
    fn recent_changes(&self, limit: u32) -> AuditRepoResult<Vec<ChangeLogEntry>>;
    /// Upserts the completion percentage for one calendar date.
    fn record_progress(&self, date: NaiveDate, percent: u8) -> AuditRepoResult<()>;
    /// Every snapshot, oldest first.
    fn progress_history(&self) -> AuditRepoResult<Vec<ProgressSnapshot>>;
}

/// SQLite-backed audit repository.
pub struct SqliteAuditRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuditRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuditRepository for SqliteAuditRepository<'_> {
    fn append_change(&self, entry: &ChangeLogEntry) -> AuditRepoResult<()> {
        self.conn.execute(
            "INSERT INTO change_log (
                change_id,
                section_id,
                section_title,
                item_id,
                item_title,
                old_status,
                new_status,
                changed_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                entry.id.to_string(),
                entry.section_id,
                entry.section_title,
                entry.item_id,
                entry.item_title,
                entry.old_status.as_str(),
                entry.new_status.as_str(),
                entry.changed_by,
            ],
        )?;
        Ok(())
    }

    fn recent_changes(&self, limit: u32) -> AuditRepoResult<Vec<ChangeLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                change_id,
                section_id,
                section_title,
                item_id,
                item_title,
                old_status,
                new_status,
                changed_by,
                changed_at
             FROM change_log
             ORDER BY changed_at DESC, rowid DESC
             LIMIT ?1;",
        )?;

        let mut rows = stmt.query([i64::from(limit)])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_change_row(row)?);
        }
        Ok(entries)
    }

    fn record_progress(&self, date: NaiveDate, percent: u8) -> AuditRepoResult<()> {
        self.conn.execute(
            "INSERT INTO progress_history (snapshot_date, percent)
             VALUES (?1, ?2)
             ON CONFLICT(snapshot_date) DO UPDATE SET
                percent = excluded.percent,
                recorded_at = (strftime('%s', 'now') * 1000);",
            params![date.format("%Y-%m-%d").to_string(), i64::from(percent)],
        )?;
        Ok(())
    }

    fn progress_history(&self) -> AuditRepoResult<Vec<ProgressSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                snapshot_date,
                percent,
                recorded_at
             FROM progress_history
             ORDER BY snapshot_date ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut snapshots = Vec::new();
        while let Some(row) = rows.next()? {
            let date_text: String = row.get("snapshot_date")?;
            let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
                AuditRepoError::InvalidData(format!(
                    "invalid date `{date_text}` in progress_history.snapshot_date"
                ))
            })?;

            let percent: i64 = row.get("percent")?;
            if !(0..=100).contains(&percent) {
                return Err(AuditRepoError::InvalidData(format!(
                    "percent {percent} out of range in progress_history.percent"
                )));
            }

            snapshots.push(ProgressSnapshot {
                date,
                percent: percent as u8,
                recorded_at: row.get("recorded_at")?,
            });
        }
        Ok(snapshots)
    }
}

fn parse_change_row(row: &Row<'_>) -> AuditRepoResult<ChangeLogEntry> {
    let id_text: String = row.get("change_id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        AuditRepoError::InvalidData(format!("invalid uuid `{id_text}` in change_log.change_id"))
    })?;

    let old_status = parse_status_column(row, "old_status")?;
    let new_status = parse_status_column(row, "new_status")?;

    Ok(ChangeLogEntry {
        id,
        section_id: row.get("section_id")?,
        section_title: row.get("section_title")?,
        item_id: row.get("item_id")?,
        item_title: row.get("item_title")?,
        old_status,
        new_status,
        changed_by: row.get("changed_by")?,
        changed_at: row.get("changed_at")?,
    })
}

fn parse_status_column(row: &Row<'_>, column: &'static str) -> AuditRepoResult<ItemStatus> {
    let value: String = row.get(column)?;
    ItemStatus::parse(&value)
        .map_err(|err| AuditRepoError::InvalidData(format!("{err} in change_log.{column}")))
}
