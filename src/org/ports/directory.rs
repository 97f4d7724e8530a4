//! Directory port for user lookup and hierarchy queries.

use crate::org::domain::{User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User persistence and lookup contract.
///
/// The directory is the source of truth for the manager/report graph; the
/// hierarchy resolver re-queries it on every resolution rather than caching
/// a snapshot.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>>;

    /// Returns the identifiers of users whose manager is any of `managers`.
    ///
    /// Direct reports only; transitive expansion is the hierarchy
    /// resolver's concern, which calls this once per frontier level.
    async fn direct_reports(&self, managers: &[UserId]) -> UserDirectoryResult<Vec<UserId>>;

    /// Returns every user record.
    async fn list(&self) -> UserDirectoryResult<Vec<User>>;

    /// Persists changes to an existing user (role, manager reference).
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::NotFound`] when the user does not
    /// exist.
    async fn save(&self, user: &User) -> UserDirectoryResult<()>;
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("directory error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
