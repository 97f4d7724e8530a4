//! Transitive resolution of the manager/report hierarchy.

use crate::org::{
    domain::UserId,
    ports::{UserDirectory, UserDirectoryError},
};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while resolving the manager hierarchy.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// The manager graph loops back on itself.
    ///
    /// A report chain that re-enters an already-traversed user cannot be
    /// resolved to a finite subordinate set; the record is surfaced as a
    /// data-integrity fault for the caller to repair.
    #[error("manager hierarchy loops through user {0}")]
    HierarchyLoop(UserId),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

/// Computes the transitive closure of a manager's reports.
#[derive(Debug)]
pub struct HierarchyResolver<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
}

impl<D> Clone for HierarchyResolver<D>
where
    D: UserDirectory,
{
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D> HierarchyResolver<D>
where
    D: UserDirectory,
{
    /// Creates a resolver over the given directory.
    #[must_use]
    pub const fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Returns every user transitively reporting to `manager`, direct and
    /// indirect, with no duplicates.
    ///
    /// The traversal expands breadth-first, issuing one directory lookup
    /// per frontier level, and re-resolves from current directory data on
    /// every call: results may be stale relative to concurrent hierarchy
    /// edits, which callers accept.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::HierarchyLoop`] when the manager graph
    /// contains a cycle, or [`HierarchyError::Directory`] when a lookup
    /// fails.
    pub async fn resolve_subordinates(
        &self,
        manager: UserId,
    ) -> Result<HashSet<UserId>, HierarchyError> {
        let mut subordinates = HashSet::new();
        let mut visited = HashSet::from([manager]);
        let mut frontier = vec![manager];

        while !frontier.is_empty() {
            let level = self.directory.direct_reports(&frontier).await?;
            frontier.clear();

            for report in level {
                if !visited.insert(report) {
                    return Err(HierarchyError::HierarchyLoop(report));
                }
                subordinates.insert(report);
                frontier.push(report);
            }
        }

        Ok(subordinates)
    }
}

/// Memoizes one manager's resolved subordinate set for the duration of a
/// single logical operation.
///
/// Policy checks within one request share a cache so the hierarchy is
/// resolved at most once per operation; the cache is discarded with the
/// request and never outlives it.
#[derive(Debug)]
pub struct SubordinateCache {
    manager: UserId,
    resolved: Option<HashSet<UserId>>,
}

impl SubordinateCache {
    /// Creates an empty cache for the given manager.
    #[must_use]
    pub const fn new(manager: UserId) -> Self {
        Self {
            manager,
            resolved: None,
        }
    }

    /// Returns whether `user` is a transitive subordinate of the cached
    /// manager, resolving the hierarchy on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`HierarchyError`] from the underlying resolution.
    pub async fn contains<D>(
        &mut self,
        resolver: &HierarchyResolver<D>,
        user: UserId,
    ) -> Result<bool, HierarchyError>
    where
        D: UserDirectory,
    {
        if self.resolved.is_none() {
            self.resolved = Some(resolver.resolve_subordinates(self.manager).await?);
        }
        Ok(self
            .resolved
            .as_ref()
            .is_some_and(|subordinates| subordinates.contains(&user)))
    }
}
