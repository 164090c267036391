//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{TeamName, User, UserId};

use super::diesel_error_mapping::{StorageFailure, classify_diesel_error, pool_error_message};
use super::diesel_team_repository::upsert_user_rows;
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify_diesel_error(error) {
        StorageFailure::Connection(message) => UserRepositoryError::connection(message),
        StorageFailure::UniqueViolation { constraint }
        | StorageFailure::ForeignKeyViolation { constraint } => {
            UserRepositoryError::query(format!(
                "constraint {} rejected the write",
                constraint.as_deref().unwrap_or("unknown")
            ))
        }
        StorageFailure::Query(message) => UserRepositoryError::query(message),
    }
}

fn into_user(row: UserRow) -> Result<User, UserRepositoryError> {
    User::try_from(row).map_err(|err| UserRepositoryError::query(err.to_string()))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(into_user).transpose()
    }

    async fn upsert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            user_id: user.id.as_str(),
            username: user.username.as_str(),
            team_name: user.team_name.as_str(),
            is_active: user.is_active,
        };

        upsert_user_rows(&mut conn, std::slice::from_ref(&row))
            .await
            .map_err(|err| match classify_diesel_error(err) {
                StorageFailure::ForeignKeyViolation { .. } => {
                    UserRepositoryError::unknown_team(user.team_name.as_str())
                }
                StorageFailure::Connection(message) => UserRepositoryError::connection(message),
                StorageFailure::UniqueViolation { .. } => {
                    UserRepositoryError::query("concurrent user upsert")
                }
                StorageFailure::Query(message) => UserRepositoryError::query(message),
            })
    }

    async fn set_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.find(id.as_str()))
            .set(users::is_active.eq(is_active))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(into_user).transpose()
    }

    async fn list_active_by_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::team_name.eq(team_name.as_str()))
            .filter(users::is_active.eq(true))
            .order(users::user_id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(into_user).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn closed_pool_maps_to_connection_error() {
        let err = map_pool_error(PoolError::build("no such host"));
        assert_eq!(err, UserRepositoryError::connection("no such host"));
    }

    #[rstest]
    fn invalid_stored_row_maps_to_query_error() {
        let row = UserRow {
            user_id: " padded".to_owned(),
            username: "alice".to_owned(),
            team_name: "core".to_owned(),
            is_active: true,
        };
        assert!(matches!(into_user(row), Err(UserRepositoryError::Query { .. })));
    }
}
