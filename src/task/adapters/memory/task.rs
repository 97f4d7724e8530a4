//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::org::domain::UserId;
use crate::task::{
    domain::{Task, TaskAudit, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Tasks and audit records live behind one lock, so the decision compound
/// write is atomic: both records land under a single write guard or, when
/// a precondition fails, neither does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    audits: HashMap<TaskId, Vec<TaskAudit>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = lock_write(&self.state)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = lock_write(&self.state)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = lock_read(&self.state)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = lock_read(&self.state)?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn list_by_participants(&self, users: &[UserId]) -> TaskRepositoryResult<Vec<Task>> {
        let state = lock_read(&self.state)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| {
                users.contains(&task.created_by())
                    || task
                        .assigned_to()
                        .is_some_and(|assignee| users.contains(&assignee))
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = lock_write(&self.state)?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        // Audit records outlive the task; the log is append-only.
        Ok(())
    }

    async fn record_decision(&self, task: &Task, audit: &TaskAudit) -> TaskRepositoryResult<()> {
        let mut state = lock_write(&self.state)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        state
            .audits
            .entry(task.id())
            .or_default()
            .push(audit.clone());
        Ok(())
    }

    async fn audit_trail(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskAudit>> {
        let state = lock_read(&self.state)?;
        Ok(state.audits.get(&task_id).cloned().unwrap_or_default())
    }
}

fn lock_read(
    state: &Arc<RwLock<InMemoryTaskState>>,
) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
    state
        .read()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

fn lock_write(
    state: &Arc<RwLock<InMemoryTaskState>>,
) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
    state
        .write()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}
