//! Repository port for task persistence and the decision compound write.

use crate::org::domain::UserId;
use crate::task::domain::{Task, TaskAudit, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// Last write wins: there is no optimistic concurrency token, and two
    /// racing updates to the same task will silently overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task record.
    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks created by or assigned to any of the given users.
    async fn list_by_participants(&self, users: &[UserId]) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task.
    ///
    /// Existing audit records are retained; the audit log is append-only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Persists an approval decision: the task update and the audit
    /// insert as one atomic unit.
    ///
    /// Both writes succeed or neither is visible; a failure leaves the
    /// task and the audit log in their pre-call state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::Persistence`] when the
    /// transactional write fails.
    async fn record_decision(&self, task: &Task, audit: &TaskAudit) -> TaskRepositoryResult<()>;

    /// Returns the audit records for a task, oldest first.
    async fn audit_trail(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskAudit>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
