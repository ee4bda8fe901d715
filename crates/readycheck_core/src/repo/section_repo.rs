//! Checklist section repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and load whole section documents (section row + ordered items
//!   + ordered evidence references).
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `replace_section` swaps a section's full item state atomically; readers
//!   never observe a half-replaced section.
//! - Item and evidence ordering is deterministic: `sort_order ASC, id ASC`.
//! - Persisted `score` must agree with the scoring derivation for the row's
//!   `status`; disagreement is rejected on read.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::section::{
    EvidenceRef, InspectionItem, InspectionSection, InvalidStatusError, ItemStatus, Score,
    SectionId, SectionStatus, SectionValidationError,
};
use crate::scoring::score_for_status;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type SectionRepoResult<T> = Result<T, SectionRepoError>;

/// Errors from section persistence and query operations.
#[derive(Debug)]
pub enum SectionRepoError {
    Validation(SectionValidationError),
    Db(DbError),
    NotFound(SectionId),
    /// Persisted status value outside the closed enum.
    InvalidStatus(InvalidStatusError),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for SectionRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "section not found: {id}"),
            Self::InvalidStatus(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted section data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "section repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "section repository requires table `{table}`")
            }
        }
    }
}

impl Error for SectionRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidStatus(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SectionValidationError> for SectionRepoError {
    fn from(value: SectionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InvalidStatusError> for SectionRepoError {
    fn from(value: InvalidStatusError) -> Self {
        Self::InvalidStatus(value)
    }
}

impl From<DbError> for SectionRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SectionRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for checklist section documents.
pub trait SectionRepository {
    /// Inserts one new section with its items; used by seeding.
    fn insert_section(&self, section: &InspectionSection) -> SectionRepoResult<()>;
    /// Loads one section with items and evidences.
    fn get_section(&self, section_id: &str) -> SectionRepoResult<Option<InspectionSection>>;
    /// Loads every section in template order.
    fn list_sections(&self) -> SectionRepoResult<Vec<InspectionSection>>;
    /// Atomically persists an engine-produced section value.
    fn replace_section(&self, section: &InspectionSection) -> SectionRepoResult<()>;
    /// Updates descriptive metadata only; items are untouched.
    fn update_metadata(
        &self,
        section_id: &str,
        responsible: &str,
        deadline: Option<NaiveDate>,
        updated_by: &str,
    ) -> SectionRepoResult<()>;
}

/// SQLite-backed section repository.
pub struct SqliteSectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSectionRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> SectionRepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SectionRepository for SqliteSectionRepository<'_> {
    fn insert_section(&self, section: &InspectionSection) -> SectionRepoResult<()> {
        section.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let sort_order: i64 = tx.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM sections;",
            [],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO sections (
                section_id,
                title,
                responsible,
                deadline,
                progress,
                status,
                sort_order,
                last_updated_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                section.id,
                section.title,
                section.responsible,
                section.deadline.map(date_to_db),
                i64::from(section.progress),
                section.status.as_str(),
                sort_order,
                section.last_updated_by.as_deref(),
            ],
        )?;

        insert_items(&tx, section)?;
        tx.commit()?;
        Ok(())
    }

    fn get_section(&self, section_id: &str) -> SectionRepoResult<Option<InspectionSection>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                section_id,
                title,
                responsible,
                deadline,
                progress,
                status,
                last_updated,
                last_updated_by
             FROM sections
             WHERE section_id = ?1;",
        )?;

        let mut rows = stmt.query([section_id])?;
        if let Some(row) = rows.next()? {
            let mut section = parse_section_row(row)?;
            section.items = load_items(self.conn, section_id)?;
            return Ok(Some(section));
        }
        Ok(None)
    }

    fn list_sections(&self) -> SectionRepoResult<Vec<InspectionSection>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                section_id,
                title,
                responsible,
                deadline,
                progress,
                status,
                last_updated,
                last_updated_by
             FROM sections
             ORDER BY sort_order ASC, section_id ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(parse_section_row(row)?);
        }

        for section in &mut sections {
            section.items = load_items(self.conn, &section.id)?;
        }
        Ok(sections)
    }

    fn replace_section(&self, section: &InspectionSection) -> SectionRepoResult<()> {
        section.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE sections
             SET
                responsible = ?2,
                deadline = ?3,
                progress = ?4,
                status = ?5,
                last_updated = (strftime('%s', 'now') * 1000),
                last_updated_by = ?6
             WHERE section_id = ?1;",
            params![
                section.id,
                section.responsible,
                section.deadline.map(date_to_db),
                i64::from(section.progress),
                section.status.as_str(),
                section.last_updated_by.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(SectionRepoError::NotFound(section.id.clone()));
        }

        // Evidence rows go with their items via ON DELETE CASCADE.
        tx.execute("DELETE FROM items WHERE section_id = ?1;", [&section.id])?;
        insert_items(&tx, section)?;
        tx.commit()?;
        Ok(())
    }

    fn update_metadata(
        &self,
        section_id: &str,
        responsible: &str,
        deadline: Option<NaiveDate>,
        updated_by: &str,
    ) -> SectionRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE sections
             SET
                responsible = ?2,
                deadline = ?3,
                last_updated = (strftime('%s', 'now') * 1000),
                last_updated_by = ?4
             WHERE section_id = ?1;",
            params![section_id, responsible, deadline.map(date_to_db), updated_by],
        )?;
        if changed == 0 {
            return Err(SectionRepoError::NotFound(section_id.to_string()));
        }
        Ok(())
    }
}

fn insert_items(tx: &Transaction<'_>, section: &InspectionSection) -> SectionRepoResult<()> {
    for (item_index, item) in section.items.iter().enumerate() {
        tx.execute(
            "INSERT INTO items (
                item_id,
                section_id,
                title,
                status,
                score,
                notes,
                sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                item.id,
                section.id,
                item.title,
                item.status.as_str(),
                item.score.points().map(i64::from),
                item.notes,
                item_index as i64,
            ],
        )?;

        for (evidence_index, evidence) in item.evidences.iter().enumerate() {
            tx.execute(
                "INSERT INTO evidences (
                    evidence_id,
                    item_id,
                    name,
                    url,
                    uploaded_at,
                    uploaded_by,
                    sort_order
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    Uuid::new_v4().to_string(),
                    item.id,
                    evidence.name,
                    evidence.url.as_deref(),
                    evidence.uploaded_at,
                    evidence.uploaded_by.as_deref(),
                    evidence_index as i64,
                ],
            )?;
        }
    }
    Ok(())
}

fn load_items(conn: &Connection, section_id: &str) -> SectionRepoResult<Vec<InspectionItem>> {
    let mut stmt = conn.prepare(
        "SELECT
            item_id,
            title,
            status,
            score,
            notes
         FROM items
         WHERE section_id = ?1
         ORDER BY sort_order ASC, item_id ASC;",
    )?;

    let mut rows = stmt.query([section_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_item_row(row)?);
    }

    for item in &mut items {
        item.evidences = load_evidences(conn, &item.id)?;
    }
    Ok(items)
}

fn load_evidences(conn: &Connection, item_id: &str) -> SectionRepoResult<Vec<EvidenceRef>> {
    let mut stmt = conn.prepare(
        "SELECT
            name,
            url,
            uploaded_at,
            uploaded_by
         FROM evidences
         WHERE item_id = ?1
         ORDER BY sort_order ASC, evidence_id ASC;",
    )?;

    let mut rows = stmt.query([item_id])?;
    let mut evidences = Vec::new();
    while let Some(row) = rows.next()? {
        evidences.push(EvidenceRef {
            name: row.get("name")?,
            url: row.get("url")?,
            uploaded_at: row.get("uploaded_at")?,
            uploaded_by: row.get("uploaded_by")?,
        });
    }
    Ok(evidences)
}

fn parse_section_row(row: &Row<'_>) -> SectionRepoResult<InspectionSection> {
    let status_text: String = row.get("status")?;
    let status = parse_section_status(&status_text).ok_or_else(|| {
        SectionRepoError::InvalidData(format!(
            "invalid section status `{status_text}` in sections.status"
        ))
    })?;

    let progress: i64 = row.get("progress")?;
    if !(0..=100).contains(&progress) {
        return Err(SectionRepoError::InvalidData(format!(
            "progress {progress} out of range in sections.progress"
        )));
    }

    let deadline = row
        .get::<_, Option<String>>("deadline")?
        .map(|value| parse_date(&value, "sections.deadline"))
        .transpose()?;

    Ok(InspectionSection {
        id: row.get("section_id")?,
        title: row.get("title")?,
        responsible: row.get("responsible")?,
        deadline,
        progress: progress as u8,
        status,
        items: Vec::new(),
        last_updated: row.get("last_updated")?,
        last_updated_by: row.get("last_updated_by")?,
    })
}

fn parse_item_row(row: &Row<'_>) -> SectionRepoResult<InspectionItem> {
    let status_text: String = row.get("status")?;
    let status = ItemStatus::parse(&status_text)?;

    let stored_score: Option<i64> = row.get("score")?;
    let expected = score_for_status(status);
    let score = match (expected, stored_score) {
        (Score::Points(points), Some(stored)) if i64::from(points) == stored => expected,
        (Score::NotApplicable, None) => expected,
        _ => {
            let item_id: String = row.get("item_id")?;
            return Err(SectionRepoError::InvalidData(format!(
                "score {stored_score:?} disagrees with status `{status_text}` for item `{item_id}`"
            )));
        }
    };

    Ok(InspectionItem {
        id: row.get("item_id")?,
        title: row.get("title")?,
        status,
        score,
        notes: row.get("notes")?,
        evidences: Vec::new(),
    })
}

fn parse_section_status(value: &str) -> Option<SectionStatus> {
    match value {
        "pending" => Some(SectionStatus::Pending),
        "in_progress" => Some(SectionStatus::InProgress),
        "done" => Some(SectionStatus::Done),
        _ => None,
    }
}

fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(value: &str, column: &'static str) -> SectionRepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SectionRepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

fn ensure_connection_ready(conn: &Connection) -> SectionRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(SectionRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["sections", "items", "evidences"] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(SectionRepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
