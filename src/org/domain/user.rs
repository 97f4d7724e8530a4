//! User aggregate, actor identity, and the closed role set.

use super::{OrgDomainError, ParseRoleError, UserId};
use serde::{Deserialize, Serialize};

/// Role held by a user within the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unrestricted access to every task and user.
    Admin,
    /// Manages a subtree of reports and their tasks.
    Manager,
    /// Works on tasks assigned to them.
    Member,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }

    /// Returns whether this role carries supervisory rights: creating
    /// tasks, assigning work to others, and deciding approvals.
    #[must_use]
    pub const fn is_supervisory(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "member" => Ok(Self::Member),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Authenticated request identity supplied by the identity collaborator.
///
/// The pair is treated as opaque, already-verified input; the core never
/// inspects credentials or secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identifier of the acting user.
    pub id: UserId,
    /// Role resolved for this request.
    pub role: Role,
}

impl Actor {
    /// Creates an actor identity.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    role: Role,
    manager: Option<UserId>,
}

/// Parameter object for reconstructing a persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted role.
    pub role: Role,
    /// Persisted manager reference, if any.
    pub manager: Option<UserId>,
}

impl User {
    /// Creates a new user with the given role and optional manager.
    ///
    /// # Errors
    ///
    /// Returns [`OrgDomainError::SelfManagement`] if the user references
    /// itself as manager.
    pub fn new(id: UserId, role: Role, manager: Option<UserId>) -> Result<Self, OrgDomainError> {
        ensure_not_self_managed(id, manager)?;
        Ok(Self { id, role, manager })
    }

    /// Reconstructs a user from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`OrgDomainError::SelfManagement`] if the persisted record
    /// references itself as manager; a self-loop in storage is a
    /// data-integrity fault, not a valid aggregate.
    pub fn from_persisted(data: PersistedUserData) -> Result<Self, OrgDomainError> {
        Self::new(data.id, data.role, data.manager)
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the manager reference, if any.
    #[must_use]
    pub const fn manager(&self) -> Option<UserId> {
        self.manager
    }

    /// Returns this user's identity as an [`Actor`].
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }

    /// Changes the user's role.
    pub const fn change_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Reassigns the user's manager.
    ///
    /// # Errors
    ///
    /// Returns [`OrgDomainError::SelfManagement`] if the new manager is the
    /// user itself.
    pub fn reassign_manager(&mut self, manager: Option<UserId>) -> Result<(), OrgDomainError> {
        ensure_not_self_managed(self.id, manager)?;
        self.manager = manager;
        Ok(())
    }
}

fn ensure_not_self_managed(id: UserId, manager: Option<UserId>) -> Result<(), OrgDomainError> {
    if manager == Some(id) {
        return Err(OrgDomainError::SelfManagement(id));
    }
    Ok(())
}
