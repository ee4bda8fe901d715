//! Preparation task use-case service.
//!
//! # Responsibility
//! - Provide validated task CRUD and the dashboard's filtered views.
//! - Stamp creator/editor attribution before persistence.
//!
//! # Invariants
//! - Titles are trimmed and must be non-blank.
//! - Deletion is final; tasks have no tombstone state.

use crate::model::section::ItemStatus;
use crate::model::task::{ActionTask, TaskId, TaskPriority, TaskValidationError};
use crate::model::user::UserRef;
use crate::repo::task_repo::{TaskRepoError, TaskRepository};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub responsible: String,
    pub due_date: NaiveDate,
    /// Loose back-reference to a checklist section.
    pub section_id: Option<String>,
}

/// Errors from task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Title is blank after trim.
    InvalidTitle,
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(TaskRepoError),
    /// Internal mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "task title must not be blank"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskRepoError> for TaskServiceError {
    fn from(value: TaskRepoError) -> Self {
        match value {
            TaskRepoError::NotFound(id) => Self::TaskNotFound(id),
            TaskRepoError::Validation(TaskValidationError::BlankTitle) => Self::InvalidTitle,
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one pending task from a draft.
    pub fn create_task(
        &self,
        draft: &TaskDraft,
        creator: &UserRef,
    ) -> Result<ActionTask, TaskServiceError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(TaskServiceError::InvalidTitle);
        }

        let mut task = ActionTask::new(title, draft.priority, draft.due_date);
        task.description = draft.description.clone();
        task.responsible = draft.responsible.clone();
        task.section_id = draft.section_id.clone();
        task.created_by = Some(creator.name.clone());
        task.last_updated_by = Some(creator.name.clone());

        let id = self.repo.create_task(&task)?;
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "created task missing on read-back",
            ))
    }

    /// Replaces one task's mutable fields.
    pub fn update_task(
        &self,
        task: &ActionTask,
        editor: &UserRef,
    ) -> Result<ActionTask, TaskServiceError> {
        if task.title.trim().is_empty() {
            return Err(TaskServiceError::InvalidTitle);
        }

        let mut updated = task.clone();
        updated.last_updated_by = Some(editor.name.clone());
        self.repo.update_task(&updated)?;
        self.repo
            .get_task(task.id)?
            .ok_or(TaskServiceError::InconsistentState(
                "updated task missing on read-back",
            ))
    }

    /// Moves one task to a new status.
    pub fn set_status(
        &self,
        id: TaskId,
        status: ItemStatus,
        editor: &UserRef,
    ) -> Result<ActionTask, TaskServiceError> {
        let mut task = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        task.status = status;
        self.update_task(&task, editor)
    }

    /// Deletes one task permanently.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete_task(id).map_err(Into::into)
    }

    /// Loads one task.
    pub fn get_task(&self, id: TaskId) -> Result<Option<ActionTask>, TaskServiceError> {
        Ok(self.repo.get_task(id)?)
    }

    /// Every task, due date ascending.
    pub fn list_tasks(&self) -> Result<Vec<ActionTask>, TaskServiceError> {
        Ok(self.repo.list_tasks()?)
    }

    /// Tasks not yet done, due date ascending.
    pub fn open_tasks(&self) -> Result<Vec<ActionTask>, TaskServiceError> {
        Ok(self.repo.list_open_tasks()?)
    }

    /// High-priority tasks not yet done, due date ascending.
    pub fn high_priority_tasks(&self) -> Result<Vec<ActionTask>, TaskServiceError> {
        Ok(self.repo.list_high_priority_tasks()?)
    }
}
