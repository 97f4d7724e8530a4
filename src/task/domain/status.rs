//! Task lifecycle status and the guarded transition table.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task exists but has no assignee yet.
    Created,
    /// Task has an assignee; work has not started.
    Assigned,
    /// Task is being worked on.
    InProgress,
    /// Work is complete and awaiting a manager/admin decision.
    PendingApproval,
    /// Task has been approved; terminal.
    Approved,
    /// Task has been rejected and may be retried.
    Rejected,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status requested over the wire.
    ///
    /// The legacy alias `completed` maps to [`Self::PendingApproval`];
    /// everything else must be one of the six canonical literals.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskStatusError`] for any other literal.
    pub fn from_request(value: &str) -> Result<Self, ParseTaskStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized == "completed" {
            return Ok(Self::PendingApproval);
        }
        Self::try_from(normalized.as_str()).map_err(|_| ParseTaskStatusError(value.to_owned()))
    }

    /// Returns whether this status records an approval decision.
    ///
    /// Decision statuses cannot be requested through the general update
    /// path; they are set by the dedicated approve/reject operations.
    #[must_use]
    pub const fn is_decision(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns whether this status permits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns whether a transition from this status to `to` is legal.
    ///
    /// A self-transition is always a legal no-op.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self == to {
            return true;
        }

        match self {
            Self::Created => matches!(to, Self::Assigned),
            Self::Assigned => matches!(to, Self::InProgress),
            Self::InProgress => matches!(to, Self::PendingApproval),
            Self::PendingApproval => matches!(to, Self::Approved | Self::Rejected),
            Self::Rejected => matches!(to, Self::InProgress),
            Self::Approved => false,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "pending_approval" => Ok(Self::PendingApproval),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
