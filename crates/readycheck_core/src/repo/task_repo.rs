//! Preparation task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus the filtered views the dashboard needs (open tasks,
//!   high-priority tasks).
//!
//! # Invariants
//! - Tasks are hard-deleted; there is no tombstone state.
//! - Every listing is ordered by `due_date ASC, task_id ASC`.

use crate::db::DbError;
use crate::model::section::ItemStatus;
use crate::model::task::{ActionTask, TaskId, TaskPriority, TaskValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    task_id,
    title,
    description,
    status,
    priority,
    responsible,
    due_date,
    section_id,
    created_at,
    created_by,
    last_updated,
    last_updated_by
FROM tasks";

pub type TaskRepoResult<T> = Result<T, TaskRepoError>;

/// Errors from task persistence and query operations.
#[derive(Debug)]
pub enum TaskRepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for TaskRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for TaskRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskRepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for TaskRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for TaskRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for preparation task CRUD.
pub trait TaskRepository {
    fn create_task(&self, task: &ActionTask) -> TaskRepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> TaskRepoResult<Option<ActionTask>>;
    fn update_task(&self, task: &ActionTask) -> TaskRepoResult<()>;
    fn delete_task(&self, id: TaskId) -> TaskRepoResult<()>;
    /// Every task, due date ascending.
    fn list_tasks(&self) -> TaskRepoResult<Vec<ActionTask>>;
    /// Tasks not yet `Done`, due date ascending.
    fn list_open_tasks(&self) -> TaskRepoResult<Vec<ActionTask>>;
    /// High-priority tasks not yet `Done`, due date ascending.
    fn list_high_priority_tasks(&self) -> TaskRepoResult<Vec<ActionTask>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &ActionTask) -> TaskRepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                task_id,
                title,
                description,
                status,
                priority,
                responsible,
                due_date,
                section_id,
                created_by,
                last_updated_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                task.id.to_string(),
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                task.responsible,
                date_to_db(task.due_date),
                task.section_id.as_deref(),
                task.created_by.as_deref(),
                task.last_updated_by.as_deref(),
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> TaskRepoResult<Option<ActionTask>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE task_id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn update_task(&self, task: &ActionTask) -> TaskRepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?2,
                description = ?3,
                status = ?4,
                priority = ?5,
                responsible = ?6,
                due_date = ?7,
                section_id = ?8,
                last_updated = (strftime('%s', 'now') * 1000),
                last_updated_by = ?9
             WHERE task_id = ?1;",
            params![
                task.id.to_string(),
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                task.responsible,
                date_to_db(task.due_date),
                task.section_id.as_deref(),
                task.last_updated_by.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(TaskRepoError::NotFound(task.id));
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> TaskRepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE task_id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(TaskRepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_tasks(&self) -> TaskRepoResult<Vec<ActionTask>> {
        self.query_tasks(&format!(
            "{TASK_SELECT_SQL} ORDER BY due_date ASC, task_id ASC;"
        ))
    }

    fn list_open_tasks(&self) -> TaskRepoResult<Vec<ActionTask>> {
        self.query_tasks(&format!(
            "{TASK_SELECT_SQL}
             WHERE status != 'done'
             ORDER BY due_date ASC, task_id ASC;"
        ))
    }

    fn list_high_priority_tasks(&self) -> TaskRepoResult<Vec<ActionTask>> {
        self.query_tasks(&format!(
            "{TASK_SELECT_SQL}
             WHERE priority = 'high'
               AND status != 'done'
             ORDER BY due_date ASC, task_id ASC;"
        ))
    }
}

impl SqliteTaskRepository<'_> {
    fn query_tasks(&self, sql: &str) -> TaskRepoResult<Vec<ActionTask>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

fn parse_task_row(row: &Row<'_>) -> TaskRepoResult<ActionTask> {
    let id_text: String = row.get("task_id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| TaskRepoError::InvalidData(format!("invalid uuid `{id_text}` in tasks.task_id")))?;

    let status_text: String = row.get("status")?;
    let status = ItemStatus::parse(&status_text).map_err(|err| {
        TaskRepoError::InvalidData(format!("{err} in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        TaskRepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let due_text: String = row.get("due_date")?;
    let due_date = parse_date(&due_text, "tasks.due_date")?;

    Ok(ActionTask {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        responsible: row.get("responsible")?,
        due_date,
        section_id: row.get("section_id")?,
        created_at: row.get("created_at")?,
        created_by: row.get("created_by")?,
        last_updated: row.get("last_updated")?,
        last_updated_by: row.get("last_updated_by")?,
    })
}

fn parse_priority(value: &str) -> Option<TaskPriority> {
    match value {
        "high" => Some(TaskPriority::High),
        "medium" => Some(TaskPriority::Medium),
        "low" => Some(TaskPriority::Low),
        _ => None,
    }
}

fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(value: &str, column: &'static str) -> TaskRepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TaskRepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}
