//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{AuditRow, TaskRow},
    schema::{task_audits, tasks},
};
use crate::org::domain::UserId;
use crate::task::{
    domain::{
        AuditAction, AuditId, PersistedAuditData, PersistedTaskData, Progress, Task, TaskAudit,
        TaskId, TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    other => TaskRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_participants(&self, users: &[UserId]) -> TaskRepositoryResult<Vec<Task>> {
        let creators: Vec<uuid::Uuid> = users.iter().map(|user| user.into_inner()).collect();
        let assignees: Vec<Option<uuid::Uuid>> = creators.iter().map(|id| Some(*id)).collect();

        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(
                    tasks::created_by
                        .eq_any(creators)
                        .or(tasks::assigned_to.eq_any(assignees)),
                )
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn record_decision(&self, task: &Task, audit: &TaskAudit) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let task_row = to_row(task);
        let audit_row = to_audit_row(audit);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|transaction| {
                let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                    .set(&task_row)
                    .execute(transaction)?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                diesel::insert_into(task_audits::table)
                    .values(&audit_row)
                    .execute(transaction)?;
                Ok(())
            })
        })
        .await
    }

    async fn audit_trail(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskAudit>> {
        self.run_blocking(move |connection| {
            let rows = task_audits::table
                .filter(task_audits::task_id.eq(task_id.into_inner()))
                .order(task_audits::created_at.asc())
                .select(AuditRow::as_select())
                .load::<AuditRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_audit).collect()
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        progress: i16::from(task.progress().value()),
        created_by: task.created_by().into_inner(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        deadline: task.deadline(),
        completed_at: task.completed_at(),
        completion_locked: task.completion_locked(),
        pending_approval_notified_at: task.pending_approval_notified_at(),
        approved_by: task.approved_by().map(UserId::into_inner),
        approved_at: task.approved_at(),
        rejected_by: task.rejected_by().map(UserId::into_inner),
        rejected_at: task.rejected_at(),
        rejection_reason: task.rejection_reason().map(ToOwned::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let progress =
        Progress::new(i32::from(row.progress)).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status,
        progress,
        created_by: UserId::from_uuid(row.created_by),
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        deadline: row.deadline,
        completed_at: row.completed_at,
        completion_locked: row.completion_locked,
        pending_approval_notified_at: row.pending_approval_notified_at,
        approved_by: row.approved_by.map(UserId::from_uuid),
        approved_at: row.approved_at,
        rejected_by: row.rejected_by.map(UserId::from_uuid),
        rejected_at: row.rejected_at,
        rejection_reason: row.rejection_reason,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn to_audit_row(audit: &TaskAudit) -> AuditRow {
    AuditRow {
        id: audit.id().into_inner(),
        task_id: audit.task_id().into_inner(),
        action: audit.action().as_str().to_owned(),
        actor_id: audit.actor().into_inner(),
        comments: audit.comments().to_owned(),
        created_at: audit.created_at(),
    }
}

fn row_to_audit(row: AuditRow) -> TaskRepositoryResult<TaskAudit> {
    let action =
        AuditAction::try_from(row.action.as_str()).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedAuditData {
        id: AuditId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        action,
        actor: UserId::from_uuid(row.actor_id),
        comments: row.comments,
        created_at: row.created_at,
    };
    Ok(TaskAudit::from_persisted(data))
}
