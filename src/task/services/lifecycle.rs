//! Service layer orchestrating the task lifecycle.

use crate::org::{
    domain::{Actor, Role, UserId},
    ports::{UserDirectory, UserDirectoryError},
    services::{HierarchyError, HierarchyResolver, SubordinateCache},
};
use crate::task::{
    domain::{
        AuditAction, NewTaskData, Progress, Task, TaskAudit, TaskChanges, TaskDomainError, TaskId,
    },
    ports::{TaskRepository, TaskRepositoryError},
    services::{AccessPolicy, AssignmentError, AssignmentPolicy},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Reason an operation was refused by policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyDenial {
    /// The actor may not view or act on this task.
    #[error("you do not have permission to access this task")]
    TaskAccess,

    /// The actor may not assign a task to the requested user.
    #[error("you do not have permission to assign a task to this user")]
    AssignmentTarget,

    /// Only managers and admins create tasks.
    #[error("only managers and admins can create tasks")]
    CreationRights,

    /// Members update only tasks assigned to themselves.
    #[error("members can only update tasks assigned to themselves")]
    NotAssignee,

    /// Members change only progress and status.
    #[error("members can only update progress and status on their own tasks")]
    RestrictedFields,

    /// Only managers and admins decide approvals.
    #[error("only managers and admins can approve or reject tasks")]
    DecisionRights,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A referenced user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// A policy check refused the operation.
    #[error("{0}")]
    Forbidden(PolicyDenial),

    /// Domain validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The task has been approved and its status can no longer change.
    #[error("task {0} is locked by an approval")]
    Locked(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Directory operation failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),

    /// Hierarchy resolution failed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl From<AssignmentError> for TaskServiceError {
    fn from(err: AssignmentError) -> Self {
        match err {
            AssignmentError::AssigneeNotFound(user) => Self::UserNotFound(user),
            AssignmentError::Directory(inner) => Self::Directory(inner),
            AssignmentError::Hierarchy(inner) => Self::Hierarchy(inner),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    assigned_to: Option<UserId>,
    progress_percentage: i32,
    deadline: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assigned_to: None,
            progress_percentage: 0,
            deadline: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets the initial progress percentage.
    #[must_use]
    pub const fn with_progress(mut self, progress_percentage: i32) -> Self {
        self.progress_percentage = progress_percentage;
        self
    }

    /// Sets the completion deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Request payload for approving a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveTaskRequest {
    task_id: TaskId,
    comments: Option<String>,
}

impl ApproveTaskRequest {
    /// Creates an approval request.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            comments: None,
        }
    }

    /// Attaches decision comments.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Request payload for rejecting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectTaskRequest {
    task_id: TaskId,
    reason: String,
    comments: Option<String>,
}

impl RejectTaskRequest {
    /// Creates a rejection request with the mandatory reason.
    #[must_use]
    pub fn new(task_id: TaskId, reason: impl Into<String>) -> Self {
        Self {
            task_id,
            reason: reason.into(),
            comments: None,
        }
    }

    /// Attaches decision comments; empty comments default to the reason.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<D, R, C>
where
    D: UserDirectory,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    access: AccessPolicy<D>,
    assignment: AssignmentPolicy<D>,
    resolver: HierarchyResolver<D>,
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<D, R, C> Clone for TaskLifecycleService<D, R, C>
where
    D: UserDirectory,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            access: self.access.clone(),
            assignment: self.assignment.clone(),
            resolver: self.resolver.clone(),
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<D, R, C> TaskLifecycleService<D, R, C>
where
    D: UserDirectory,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(directory: Arc<D>, repository: Arc<R>, clock: Arc<C>) -> Self {
        let resolver = HierarchyResolver::new(Arc::clone(&directory));
        Self {
            access: AccessPolicy::new(resolver.clone()),
            assignment: AssignmentPolicy::new(directory, resolver.clone()),
            resolver,
            repository,
            clock,
        }
    }

    /// Returns whether the actor may view or act on the task.
    ///
    /// # Errors
    ///
    /// Propagates hierarchy resolution failures.
    pub async fn can_access_task(&self, task: &Task, actor: Actor) -> TaskServiceResult<bool> {
        Ok(self.access.can_access_task(task, actor).await?)
    }

    /// Returns whether the assigner may hand a task to `assignee`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserNotFound`] when the target user is
    /// absent, and propagates directory and hierarchy failures.
    pub async fn can_assign_task(
        &self,
        assigner: Actor,
        assignee: Option<UserId>,
    ) -> TaskServiceResult<bool> {
        Ok(self.assignment.can_assign_task(assigner, assignee).await?)
    }

    /// Creates a task on behalf of the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] unless the actor holds
    /// creation rights and may assign to the requested initial assignee,
    /// [`TaskServiceError::Validation`] for out-of-range progress, and
    /// propagates persistence failures.
    pub async fn create_task(
        &self,
        actor: Actor,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        if !actor.role.is_supervisory() {
            return Err(TaskServiceError::Forbidden(PolicyDenial::CreationRights));
        }

        let progress = Progress::new(request.progress_percentage)?;
        if let Some(assignee) = request.assigned_to {
            let allowed = self
                .assignment
                .can_assign_task(actor, Some(assignee))
                .await?;
            if !allowed {
                return Err(TaskServiceError::Forbidden(PolicyDenial::AssignmentTarget));
            }
        }

        let task = Task::new(
            NewTaskData {
                title: request.title,
                description: request.description,
                created_by: actor.id,
                assigned_to: request.assigned_to,
                progress,
                deadline: request.deadline,
            },
            &*self.clock,
        );
        self.repository.insert(&task).await?;
        info!(task = %task.id(), actor = %actor.id, status = %task.status(), "task created");
        Ok(task)
    }

    /// Returns a task the actor may view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when absent and
    /// [`TaskServiceError::Forbidden`] when the access policy refuses.
    pub async fn get_task(&self, actor: Actor, task_id: TaskId) -> TaskServiceResult<Task> {
        let task = self.fetch(task_id).await?;
        self.ensure_access(&task, actor).await?;
        Ok(task)
    }

    /// Returns every task visible to the actor.
    ///
    /// Admins see all tasks; managers see tasks whose creator or assignee
    /// is themselves or a transitive subordinate; members see tasks they
    /// created or are assigned.
    ///
    /// # Errors
    ///
    /// Propagates hierarchy and persistence failures.
    pub async fn list_tasks(&self, actor: Actor) -> TaskServiceResult<Vec<Task>> {
        match actor.role {
            Role::Admin => Ok(self.repository.list_all().await?),
            Role::Manager => {
                let subordinates = self.resolver.resolve_subordinates(actor.id).await?;
                let mut participants: Vec<UserId> = subordinates.into_iter().collect();
                participants.push(actor.id);
                Ok(self.repository.list_by_participants(&participants).await?)
            }
            Role::Member => Ok(self.repository.list_by_participants(&[actor.id]).await?),
        }
    }

    /// Applies a patch to a task through the guarded update pipeline.
    ///
    /// Policy guards run first (access, member restrictions, assignment),
    /// then the domain state machine validates and applies the patch; no
    /// field is persisted unless every guard passes.
    ///
    /// # Errors
    ///
    /// Returns the matching [`TaskServiceError`] for each guard:
    /// `TaskNotFound`, `Forbidden`, `Validation`, `Locked`, or a
    /// propagated infrastructure failure.
    pub async fn update_task(
        &self,
        actor: Actor,
        task_id: TaskId,
        changes: &TaskChanges,
    ) -> TaskServiceResult<Task> {
        let mut task = self.fetch(task_id).await?;
        let mut cache = SubordinateCache::new(actor.id);

        let accessible = self
            .access
            .can_access_task_with(&task, actor, &mut cache)
            .await?;
        if !accessible {
            return Err(TaskServiceError::Forbidden(PolicyDenial::TaskAccess));
        }

        if actor.role == Role::Member {
            if task.assigned_to() != Some(actor.id) {
                return Err(TaskServiceError::Forbidden(PolicyDenial::NotAssignee));
            }
            if !changes.is_progress_and_status_only() {
                return Err(TaskServiceError::Forbidden(PolicyDenial::RestrictedFields));
            }
        }

        if let Some(change) = changes.assignee() {
            let allowed = self
                .assignment
                .can_assign_task_with(actor, change.target(), &mut cache)
                .await?;
            if !allowed {
                return Err(TaskServiceError::Forbidden(PolicyDenial::AssignmentTarget));
            }
        }

        task.apply_changes(changes, &*self.clock)
            .map_err(|err| match err {
                TaskDomainError::CompletionLocked => TaskServiceError::Locked(task_id),
                other => TaskServiceError::Validation(other),
            })?;

        self.repository.update(&task).await?;
        debug!(task = %task.id(), actor = %actor.id, status = %task.status(), "task updated");
        Ok(task)
    }

    /// Approves a pending task and records the decision audit atomically.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] unless the actor is a
    /// manager or admin with access, [`TaskServiceError::Validation`]
    /// unless the task is pending approval, and propagates a failed
    /// compound write with both records rolled back.
    pub async fn approve_task(
        &self,
        actor: Actor,
        request: ApproveTaskRequest,
    ) -> TaskServiceResult<Task> {
        ensure_decision_rights(actor)?;
        let mut task = self.fetch(request.task_id).await?;
        self.ensure_access(&task, actor).await?;

        task.approve(actor.id, &*self.clock)?;
        let audit = TaskAudit::record(
            task.id(),
            AuditAction::Approved,
            actor.id,
            request.comments.unwrap_or_default(),
            &*self.clock,
        );
        self.repository.record_decision(&task, &audit).await?;
        info!(task = %task.id(), actor = %actor.id, "task approved");
        Ok(task)
    }

    /// Rejects a pending task and records the decision audit atomically.
    ///
    /// Empty decision comments default to the rejection reason.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] unless the actor is a
    /// manager or admin with access, [`TaskServiceError::Validation`]
    /// unless the task is pending approval with a non-empty reason, and
    /// propagates a failed compound write with both records rolled back.
    pub async fn reject_task(
        &self,
        actor: Actor,
        request: RejectTaskRequest,
    ) -> TaskServiceResult<Task> {
        ensure_decision_rights(actor)?;
        let mut task = self.fetch(request.task_id).await?;
        self.ensure_access(&task, actor).await?;

        task.reject(actor.id, &request.reason, &*self.clock)?;
        let comments = request
            .comments
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| request.reason.clone());
        let audit = TaskAudit::record(
            task.id(),
            AuditAction::Rejected,
            actor.id,
            comments,
            &*self.clock,
        );
        self.repository.record_decision(&task, &audit).await?;
        info!(task = %task.id(), actor = %actor.id, "task rejected");
        Ok(task)
    }

    /// Deletes a task the actor may access.
    ///
    /// Deletion sits outside the state machine: any accessible task may
    /// be deleted unconditionally. Audit records are retained.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when absent,
    /// [`TaskServiceError::Forbidden`] when access is refused, and
    /// propagates persistence failures.
    pub async fn delete_task(&self, actor: Actor, task_id: TaskId) -> TaskServiceResult<()> {
        let task = self.fetch(task_id).await?;
        self.ensure_access(&task, actor).await?;
        self.repository.delete(task_id).await?;
        info!(task = %task_id, actor = %actor.id, "task deleted");
        Ok(())
    }

    /// Returns the audit trail of a task the actor may view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when absent,
    /// [`TaskServiceError::Forbidden`] when access is refused, and
    /// propagates persistence failures.
    pub async fn audit_trail(
        &self,
        actor: Actor,
        task_id: TaskId,
    ) -> TaskServiceResult<Vec<TaskAudit>> {
        let task = self.fetch(task_id).await?;
        self.ensure_access(&task, actor).await?;
        Ok(self.repository.audit_trail(task_id).await?)
    }

    async fn fetch(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(task_id))
    }

    async fn ensure_access(&self, task: &Task, actor: Actor) -> TaskServiceResult<()> {
        let accessible = self.access.can_access_task(task, actor).await?;
        if accessible {
            Ok(())
        } else {
            Err(TaskServiceError::Forbidden(PolicyDenial::TaskAccess))
        }
    }
}

const fn ensure_decision_rights(actor: Actor) -> TaskServiceResult<()> {
    if actor.role.is_supervisory() {
        Ok(())
    } else {
        Err(TaskServiceError::Forbidden(PolicyDenial::DecisionRights))
    }
}
