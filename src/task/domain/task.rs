//! Task aggregate root and the guarded mutation pipeline.

use super::{AssigneeChange, Progress, TaskChanges, TaskDomainError, TaskId, TaskStatus};
use crate::org::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// All status mutations pass through the guarded methods here; fields are
/// never written until every validation on the requested change has
/// passed, so a failed request leaves the aggregate untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    progress: Progress,
    created_by: UserId,
    assigned_to: Option<UserId>,
    deadline: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    completion_locked: bool,
    pending_approval_notified_at: Option<DateTime<Utc>>,
    approved_by: Option<UserId>,
    approved_at: Option<DateTime<Utc>>,
    rejected_by: Option<UserId>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Creating user.
    pub created_by: UserId,
    /// Initial assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Initial progress.
    pub progress: Progress,
    /// Optional completion deadline.
    pub deadline: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted progress.
    pub progress: Progress,
    /// Persisted creator reference.
    pub created_by: UserId,
    /// Persisted assignee reference, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted completion lock.
    pub completion_locked: bool,
    /// Persisted pending-approval notification timestamp, if any.
    pub pending_approval_notified_at: Option<DateTime<Utc>>,
    /// Persisted approver reference, if any.
    pub approved_by: Option<UserId>,
    /// Persisted approval timestamp, if any.
    pub approved_at: Option<DateTime<Utc>>,
    /// Persisted rejecter reference, if any.
    pub rejected_by: Option<UserId>,
    /// Persisted rejection timestamp, if any.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Persisted rejection reason, if any.
    pub rejection_reason: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task.
    ///
    /// The initial status is [`TaskStatus::Created`] without an assignee
    /// and [`TaskStatus::Assigned`] with one.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let status = if data.assigned_to.is_some() {
            TaskStatus::Assigned
        } else {
            TaskStatus::Created
        };

        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status,
            progress: data.progress,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            deadline: data.deadline,
            completed_at: None,
            completion_locked: false,
            pending_approval_notified_at: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            progress: data.progress,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            deadline: data.deadline,
            completed_at: data.completed_at,
            completion_locked: data.completion_locked,
            pending_approval_notified_at: data.pending_approval_notified_at,
            approved_by: data.approved_by,
            approved_at: data.approved_at,
            rejected_by: data.rejected_by,
            rejected_at: data.rejected_at,
            rejection_reason: data.rejection_reason,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the recorded progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns whether the status is locked by an approval.
    #[must_use]
    pub const fn completion_locked(&self) -> bool {
        self.completion_locked
    }

    /// Returns when the task entered pending approval, if it has.
    #[must_use]
    pub const fn pending_approval_notified_at(&self) -> Option<DateTime<Utc>> {
        self.pending_approval_notified_at
    }

    /// Returns the approver, if any.
    #[must_use]
    pub const fn approved_by(&self) -> Option<UserId> {
        self.approved_by
    }

    /// Returns the approval timestamp, if any.
    #[must_use]
    pub const fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    /// Returns the rejecter, if any.
    #[must_use]
    pub const fn rejected_by(&self) -> Option<UserId> {
        self.rejected_by
    }

    /// Returns the rejection timestamp, if any.
    #[must_use]
    pub const fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    /// Returns the rejection reason, if any.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a validated patch to the task.
    ///
    /// Every requested field is validated before any field is written:
    /// progress must be 0–100; a requested status must be a known
    /// non-decision literal whose transition is legal from the task's
    /// effective status (after any assignee-driven promotion from
    /// `created` to `assigned`); `pending_approval` additionally requires
    /// complete progress. Entering `pending_approval` stamps the
    /// completion and notification timestamps; leaving `rejected` for
    /// `in_progress` clears the rejection fields for retry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CompletionLocked`] when the task has
    /// been approved and the patch requests any other status, and the
    /// matching validation error for each guard described above.
    pub fn apply_changes(
        &mut self,
        changes: &TaskChanges,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let staged_progress = changes
            .progress_percentage()
            .map(Progress::new)
            .transpose()?;
        let staged_status = self.stage_status(changes, staged_progress)?;

        if let Some(progress) = staged_progress {
            self.progress = progress;
        }
        if let Some(title) = changes.title() {
            self.title = title.to_owned();
        }
        if let Some(description) = changes.description() {
            self.description = description.to_owned();
        }
        if let Some(deadline) = changes.deadline() {
            self.deadline = Some(deadline);
        }
        match changes.assignee() {
            Some(AssigneeChange::Assign(user)) => {
                self.assigned_to = Some(user);
                if self.status == TaskStatus::Created {
                    self.status = TaskStatus::Assigned;
                }
            }
            Some(AssigneeChange::Unassign) => {
                self.assigned_to = None;
            }
            None => {}
        }
        if let Some(target) = staged_status {
            self.enter_status(target, clock);
        }

        self.touch(clock);
        Ok(())
    }

    /// Validates a requested status against the effective pre-write state.
    fn stage_status(
        &self,
        changes: &TaskChanges,
        staged_progress: Option<Progress>,
    ) -> Result<Option<TaskStatus>, TaskDomainError> {
        let Some(raw) = changes.status() else {
            return Ok(None);
        };

        let target = TaskStatus::from_request(raw)?;
        if target.is_decision() {
            return Err(TaskDomainError::DecisionViaUpdate(target));
        }

        // An assignee landing on a freshly created task promotes it to
        // assigned before the requested transition is judged.
        let mut effective = self.status;
        if effective == TaskStatus::Created
            && matches!(changes.assignee(), Some(AssigneeChange::Assign(_)))
        {
            effective = TaskStatus::Assigned;
        }

        if (self.completion_locked || effective == TaskStatus::Approved)
            && target != TaskStatus::Approved
        {
            return Err(TaskDomainError::CompletionLocked);
        }
        if !effective.can_transition_to(target) {
            return Err(TaskDomainError::InvalidTransition {
                from: effective,
                to: target,
            });
        }
        let progress = staged_progress.unwrap_or(self.progress);
        if target == TaskStatus::PendingApproval && !progress.is_complete() {
            return Err(TaskDomainError::IncompleteProgress(progress));
        }

        Ok(Some(target))
    }

    /// Writes a validated status, with entry bookkeeping.
    fn enter_status(&mut self, target: TaskStatus, clock: &impl Clock) {
        if target == TaskStatus::PendingApproval {
            let now = clock.utc();
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
            self.pending_approval_notified_at = Some(now);
        }
        if self.status == TaskStatus::Rejected && target == TaskStatus::InProgress {
            self.rejection_reason = None;
            self.rejected_by = None;
            self.rejected_at = None;
        }
        self.status = target;
    }

    /// Approves the task, locking its completion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPendingApproval`] unless the task is
    /// awaiting a decision.
    pub fn approve(&mut self, approver: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::PendingApproval {
            return Err(TaskDomainError::NotPendingApproval(self.status));
        }

        let now = clock.utc();
        self.status = TaskStatus::Approved;
        self.approved_by = Some(approver);
        self.approved_at = Some(now);
        self.rejected_by = None;
        self.rejected_at = None;
        self.completion_locked = true;
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.touch(clock);
        Ok(())
    }

    /// Rejects the task with a mandatory reason, reopening it for retry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPendingApproval`] unless the task is
    /// awaiting a decision, or [`TaskDomainError::MissingRejectionReason`]
    /// when the reason is empty after trimming.
    pub fn reject(
        &mut self,
        rejecter: UserId,
        reason: &str,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::PendingApproval {
            return Err(TaskDomainError::NotPendingApproval(self.status));
        }
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::MissingRejectionReason);
        }

        let now = clock.utc();
        self.status = TaskStatus::Rejected;
        self.rejected_by = Some(rejecter);
        self.rejected_at = Some(now);
        self.rejection_reason = Some(trimmed.to_owned());
        self.completion_locked = false;
        self.approved_by = None;
        self.approved_at = None;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
