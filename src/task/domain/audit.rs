//! Immutable audit records for approval decisions.

use super::{AuditId, TaskId};
use crate::org::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision captured by an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The task was approved.
    Approved,
    /// The task was rejected.
    Rejected,
}

impl AuditAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for AuditAction {
    type Error = ParseAuditActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseAuditActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing audit actions from persistence.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown audit action: {0}")]
pub struct ParseAuditActionError(pub String);

/// Append-only record of one approval or rejection decision.
///
/// Audit records are written exactly once, atomically with the task-state
/// change they describe, and are never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAudit {
    id: AuditId,
    task_id: TaskId,
    action: AuditAction,
    actor: UserId,
    comments: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAuditData {
    /// Persisted audit identifier.
    pub id: AuditId,
    /// Task the decision applied to.
    pub task_id: TaskId,
    /// Recorded decision.
    pub action: AuditAction,
    /// User who made the decision.
    pub actor: UserId,
    /// Free-text decision comments.
    pub comments: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskAudit {
    /// Creates a new audit record for a decision made now.
    #[must_use]
    pub fn record(
        task_id: TaskId,
        action: AuditAction,
        actor: UserId,
        comments: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AuditId::new(),
            task_id,
            action,
            actor,
            comments: comments.into(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an audit record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAuditData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            action: data.action,
            actor: data.actor,
            comments: data.comments,
            created_at: data.created_at,
        }
    }

    /// Returns the audit identifier.
    #[must_use]
    pub const fn id(&self) -> AuditId {
        self.id
    }

    /// Returns the task the decision applied to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded decision.
    #[must_use]
    pub const fn action(&self) -> AuditAction {
        self.action
    }

    /// Returns the deciding user.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        self.actor
    }

    /// Returns the decision comments.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
