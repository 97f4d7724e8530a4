//! In-memory user directory for hierarchy and policy tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::org::{
    domain::{User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record.
    ///
    /// Seeding hook for adapters-as-test-doubles; the port itself only
    /// updates existing records.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Persistence`] when the store lock is
    /// poisoned.
    pub fn insert(&self, user: User) -> UserDirectoryResult<()> {
        let mut state = lock_write(&self.state)?;
        state.insert(user.id(), user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        let state = lock_read(&self.state)?;
        Ok(state.get(&id).cloned())
    }

    async fn direct_reports(&self, managers: &[UserId]) -> UserDirectoryResult<Vec<UserId>> {
        let state = lock_read(&self.state)?;
        Ok(state
            .values()
            .filter(|user| {
                user.manager()
                    .is_some_and(|manager| managers.contains(&manager))
            })
            .map(User::id)
            .collect())
    }

    async fn list(&self) -> UserDirectoryResult<Vec<User>> {
        let state = lock_read(&self.state)?;
        Ok(state.values().cloned().collect())
    }

    async fn save(&self, user: &User) -> UserDirectoryResult<()> {
        let mut state = lock_write(&self.state)?;
        if !state.contains_key(&user.id()) {
            return Err(UserDirectoryError::NotFound(user.id()));
        }
        state.insert(user.id(), user.clone());
        Ok(())
    }
}

fn lock_read(
    state: &Arc<RwLock<HashMap<UserId, User>>>,
) -> UserDirectoryResult<std::sync::RwLockReadGuard<'_, HashMap<UserId, User>>> {
    state
        .read()
        .map_err(|err| UserDirectoryError::persistence(std::io::Error::other(err.to_string())))
}

fn lock_write(
    state: &Arc<RwLock<HashMap<UserId, User>>>,
) -> UserDirectoryResult<std::sync::RwLockWriteGuard<'_, HashMap<UserId, User>>> {
    state
        .write()
        .map_err(|err| UserDirectoryError::persistence(std::io::Error::other(err.to_string())))
}
