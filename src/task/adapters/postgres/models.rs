//! Diesel row models for task persistence.

use super::schema::{task_audits, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for task records.
///
/// `treat_none_as_null` matters for the changeset: clearing a rejection
/// field on retry must write `NULL`, not skip the column.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status literal.
    pub status: String,
    /// Completion percentage.
    pub progress: i16,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Optional assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Optional completion deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether an approval has locked the status.
    pub completion_locked: bool,
    /// When the task entered pending approval.
    pub pending_approval_notified_at: Option<DateTime<Utc>>,
    /// Approving user.
    pub approved_by: Option<uuid::Uuid>,
    /// Approval timestamp.
    pub approved_at: Option<DateTime<Utc>>,
    /// Rejecting user.
    pub rejected_by: Option<uuid::Uuid>,
    /// Rejection timestamp.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Rejection reason.
    pub rejection_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for audit records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_audits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditRow {
    /// Audit identifier.
    pub id: uuid::Uuid,
    /// Task the decision applied to.
    pub task_id: uuid::Uuid,
    /// Decision literal.
    pub action: String,
    /// Deciding user.
    pub actor_id: uuid::Uuid,
    /// Free-text decision comments.
    pub comments: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
