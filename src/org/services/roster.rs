//! Administration of user roles and manager assignments.

use crate::org::{
    domain::{Actor, OrgDomainError, Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors returned by roster administration operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The acting user is not an admin.
    #[error("only admins may administer users")]
    AdminRequired,

    /// The target user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] OrgDomainError),

    /// Directory operation failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

/// Requested changes to a user record.
///
/// `role` of `None` leaves the role unchanged; `manager` is always applied,
/// with `None` clearing the manager reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserUpdate {
    /// New role, if changing.
    pub role: Option<Role>,
    /// New manager reference; `None` detaches the user from any manager.
    pub manager: Option<UserId>,
}

/// User administration service.
#[derive(Debug)]
pub struct RosterService<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
}

impl<D> Clone for RosterService<D>
where
    D: UserDirectory,
{
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D> RosterService<D>
where
    D: UserDirectory,
{
    /// Creates a roster service over the given directory.
    #[must_use]
    pub const fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Returns every user record.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::AdminRequired`] unless the actor is an admin,
    /// or [`RosterError::Directory`] when the listing fails.
    pub async fn list_users(&self, actor: Actor) -> Result<Vec<User>, RosterError> {
        ensure_admin(actor)?;
        Ok(self.directory.list().await?)
    }

    /// Applies a role or manager change to the target user.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::AdminRequired`] unless the actor is an admin,
    /// [`RosterError::NotFound`] when the target does not exist,
    /// [`RosterError::Domain`] when the update would make the user their
    /// own manager, or [`RosterError::Directory`] when persistence fails.
    pub async fn update_user(
        &self,
        actor: Actor,
        target: UserId,
        update: UserUpdate,
    ) -> Result<User, RosterError> {
        ensure_admin(actor)?;

        let mut user = self
            .directory
            .find_by_id(target)
            .await?
            .ok_or(RosterError::NotFound(target))?;

        if let Some(role) = update.role {
            user.change_role(role);
        }
        user.reassign_manager(update.manager)?;

        self.directory.save(&user).await?;
        info!(user = %user.id(), actor = %actor.id, "user record updated");
        Ok(user)
    }
}

const fn ensure_admin(actor: Actor) -> Result<(), RosterError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Manager | Role::Member => Err(RosterError::AdminRequired),
    }
}
