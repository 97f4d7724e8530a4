//! Patch object describing a requested task update.

use crate::org::domain::UserId;
use chrono::{DateTime, Utc};

/// Requested change to a task's assignee.
///
/// Absence is explicit: `Unassign` clears the assignee rather than a
/// sentinel identifier standing in for "nobody".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeChange {
    /// Assign the task to the given user.
    Assign(UserId),
    /// Clear the current assignee.
    Unassign,
}

impl AssigneeChange {
    /// Returns the target user, or `None` when unassigning.
    #[must_use]
    pub const fn target(self) -> Option<UserId> {
        match self {
            Self::Assign(user) => Some(user),
            Self::Unassign => None,
        }
    }
}

/// Fields a caller wants to change on a task.
///
/// Absent fields are left untouched. The `status` literal stays raw here;
/// normalization and transition validation are the state machine's duty,
/// so malformed literals fail inside the engine rather than at the
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    title: Option<String>,
    description: Option<String>,
    assignee: Option<AssigneeChange>,
    status: Option<String>,
    progress_percentage: Option<i32>,
    deadline: Option<DateTime<Utc>>,
}

impl TaskChanges {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets an assignee change.
    #[must_use]
    pub const fn with_assignee(mut self, change: AssigneeChange) -> Self {
        self.assignee = Some(change);
        self
    }

    /// Sets a requested status literal.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets a new progress percentage.
    #[must_use]
    pub const fn with_progress(mut self, progress_percentage: i32) -> Self {
        self.progress_percentage = Some(progress_percentage);
        self
    }

    /// Sets a new deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the requested title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the requested description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the requested assignee change, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<AssigneeChange> {
        self.assignee
    }

    /// Returns the requested status literal, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the requested progress percentage, if any.
    #[must_use]
    pub const fn progress_percentage(&self) -> Option<i32> {
        self.progress_percentage
    }

    /// Returns the requested deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns whether the patch touches only progress and status.
    ///
    /// Member actors are restricted to these two fields on their own
    /// tasks.
    #[must_use]
    pub const fn is_progress_and_status_only(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee.is_none()
            && self.deadline.is_none()
    }
}
