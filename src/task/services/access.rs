//! Decides whether an actor may view or act on a task.

use crate::org::{
    domain::{Actor, Role, UserId},
    ports::UserDirectory,
    services::{HierarchyError, HierarchyResolver, SubordinateCache},
};
use crate::task::domain::Task;

/// Task visibility policy.
///
/// Read-only: evaluating the policy never mutates any record, and a stale
/// hierarchy snapshot read concurrently with a manager reassignment is an
/// accepted outcome, not an error.
#[derive(Debug)]
pub struct AccessPolicy<D>
where
    D: UserDirectory,
{
    resolver: HierarchyResolver<D>,
}

impl<D> Clone for AccessPolicy<D>
where
    D: UserDirectory,
{
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}

impl<D> AccessPolicy<D>
where
    D: UserDirectory,
{
    /// Creates an access policy over the given hierarchy resolver.
    #[must_use]
    pub const fn new(resolver: HierarchyResolver<D>) -> Self {
        Self { resolver }
    }

    /// Returns whether the actor may view or act on the task.
    ///
    /// Admins always may; members only on tasks they created or are
    /// assigned; managers additionally on tasks whose creator or assignee
    /// is a transitive subordinate.
    ///
    /// # Errors
    ///
    /// Propagates [`HierarchyError`] when subordinate resolution fails;
    /// resolution failures are surfaced, never coerced into a denial.
    pub async fn can_access_task(&self, task: &Task, actor: Actor) -> Result<bool, HierarchyError> {
        let mut cache = SubordinateCache::new(actor.id);
        self.can_access_task_with(task, actor, &mut cache).await
    }

    /// [`Self::can_access_task`] sharing a caller-held subordinate cache,
    /// so one logical operation resolves the hierarchy at most once.
    ///
    /// # Errors
    ///
    /// Propagates [`HierarchyError`] when subordinate resolution fails.
    pub async fn can_access_task_with(
        &self,
        task: &Task,
        actor: Actor,
        cache: &mut SubordinateCache,
    ) -> Result<bool, HierarchyError> {
        match actor.role {
            Role::Admin => Ok(true),
            Role::Member => Ok(is_participant(task, actor.id)),
            Role::Manager => {
                if is_participant(task, actor.id) {
                    return Ok(true);
                }
                if cache.contains(&self.resolver, task.created_by()).await? {
                    return Ok(true);
                }
                match task.assigned_to() {
                    Some(assignee) => cache.contains(&self.resolver, assignee).await,
                    None => Ok(false),
                }
            }
        }
    }
}

/// Returns whether the user created the task or is assigned to it.
fn is_participant(task: &Task, user: UserId) -> bool {
    task.created_by() == user || task.assigned_to() == Some(user)
}
