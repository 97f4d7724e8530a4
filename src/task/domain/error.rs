//! Error types for task domain validation and parsing.

use super::{Progress, TaskStatus};
use thiserror::Error;

/// Errors returned while validating task mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The progress percentage falls outside 0–100.
    #[error("progress_percentage must be between 0 and 100, got {0}")]
    ProgressOutOfRange(i32),

    /// The requested status literal is not part of the lifecycle.
    #[error(transparent)]
    UnknownStatus(#[from] ParseTaskStatusError),

    /// A decision status was requested through the general update path.
    #[error("status {0} requires the dedicated approve or reject operation")]
    DecisionViaUpdate(TaskStatus),

    /// The requested transition is not in the lifecycle table.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },

    /// Pending approval was requested before the work was complete.
    #[error("progress_percentage must be 100 before moving to pending_approval, got {0}")]
    IncompleteProgress(Progress),

    /// The task has been approved and its status is locked.
    #[error("approved tasks are locked")]
    CompletionLocked,

    /// An approval decision was attempted outside `pending_approval`.
    #[error("only pending_approval tasks can be decided, current status is {0}")]
    NotPendingApproval(TaskStatus),

    /// A rejection was attempted without a reason.
    #[error("rejection reason is required")]
    MissingRejectionReason,
}

/// Error returned while parsing status literals from the boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
