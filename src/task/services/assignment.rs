//! Decides whether an actor may assign a task to a target user.

use crate::org::{
    domain::{Actor, Role, UserId},
    ports::{UserDirectory, UserDirectoryError},
    services::{HierarchyError, HierarchyResolver, SubordinateCache},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while evaluating assignment permission.
///
/// A missing assignee is an error, not a denial: the caller must be able
/// to distinguish "you may not" from "that user does not exist".
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// The target user does not exist.
    #[error("assignee not found: {0}")]
    AssigneeNotFound(UserId),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),

    /// Hierarchy resolution failed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// Task assignment policy.
#[derive(Debug)]
pub struct AssignmentPolicy<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    resolver: HierarchyResolver<D>,
}

impl<D> Clone for AssignmentPolicy<D>
where
    D: UserDirectory,
{
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            resolver: self.resolver.clone(),
        }
    }
}

impl<D> AssignmentPolicy<D>
where
    D: UserDirectory,
{
    /// Creates an assignment policy over the given directory and
    /// resolver.
    #[must_use]
    pub const fn new(directory: Arc<D>, resolver: HierarchyResolver<D>) -> Self {
        Self {
            directory,
            resolver,
        }
    }

    /// Returns whether the assigner may hand the task to `assignee`.
    ///
    /// `None` means "leave unassigned", permitted to admins and managers.
    /// Admins may assign to anyone; nobody else may assign to an admin;
    /// managers may assign to themselves or a transitive subordinate;
    /// members only to themselves.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::AssigneeNotFound`] when the target user
    /// is absent, and propagates directory and hierarchy failures.
    pub async fn can_assign_task(
        &self,
        assigner: Actor,
        assignee: Option<UserId>,
    ) -> Result<bool, AssignmentError> {
        let mut cache = SubordinateCache::new(assigner.id);
        self.can_assign_task_with(assigner, assignee, &mut cache)
            .await
    }

    /// [`Self::can_assign_task`] sharing a caller-held subordinate cache,
    /// so one logical operation resolves the hierarchy at most once.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::AssigneeNotFound`] when the target user
    /// is absent, and propagates directory and hierarchy failures.
    pub async fn can_assign_task_with(
        &self,
        assigner: Actor,
        assignee: Option<UserId>,
        cache: &mut SubordinateCache,
    ) -> Result<bool, AssignmentError> {
        let Some(assignee_id) = assignee else {
            return Ok(assigner.role.is_supervisory());
        };

        if assigner.role == Role::Admin {
            return Ok(true);
        }

        let target = self
            .directory
            .find_by_id(assignee_id)
            .await?
            .ok_or(AssignmentError::AssigneeNotFound(assignee_id))?;
        if target.role() == Role::Admin {
            return Ok(false);
        }

        match assigner.role {
            Role::Admin => Ok(true),
            Role::Manager => {
                if assignee_id == assigner.id {
                    return Ok(true);
                }
                Ok(cache.contains(&self.resolver, assignee_id).await?)
            }
            Role::Member => Ok(assignee_id == assigner.id),
        }
    }
}
