//! `PostgreSQL` user directory implementation.

use super::{models::UserRow, schema::users};
use crate::org::{
    domain::{PersistedUserData, Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by org adapters.
pub type OrgPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: OrgPgPool,
}

impl PostgresUserDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: OrgPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn direct_reports(&self, managers: &[UserId]) -> UserDirectoryResult<Vec<UserId>> {
        let targets: Vec<Option<uuid::Uuid>> = managers
            .iter()
            .map(|manager| Some(manager.into_inner()))
            .collect();
        self.run_blocking(move |connection| {
            let ids = users::table
                .filter(users::manager_id.eq_any(targets))
                .select(users::id)
                .load::<uuid::Uuid>(connection)
                .map_err(UserDirectoryError::persistence)?;
            Ok(ids.into_iter().map(UserId::from_uuid).collect())
        })
        .await
    }

    async fn list(&self) -> UserDirectoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserDirectoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn save(&self, user: &User) -> UserDirectoryResult<()> {
        let id = user.id();
        let role = user.role().as_str().to_owned();
        let manager_id = user.manager().map(UserId::into_inner);
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(id.into_inner())))
                .set((users::role.eq(role), users::manager_id.eq(manager_id)))
                .execute(connection)
                .map_err(UserDirectoryError::persistence)?;
            if updated == 0 {
                return Err(UserDirectoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> UserDirectoryResult<User> {
    let role = Role::try_from(row.role.as_str()).map_err(UserDirectoryError::persistence)?;
    let data = PersistedUserData {
        id: UserId::from_uuid(row.id),
        role,
        manager: row.manager_id.map(UserId::from_uuid),
    };
    User::from_persisted(data).map_err(UserDirectoryError::persistence)
}
