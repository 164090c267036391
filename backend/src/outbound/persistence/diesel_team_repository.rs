//! PostgreSQL-backed `TeamRepository` implementation using Diesel ORM.
//!
//! Team creation relies on the primary key of `teams`: the insert uses
//! `ON CONFLICT DO NOTHING` and zero affected rows is reported as a duplicate.
//! Members are upserted in the same transaction, moving existing users into
//! the team.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{TeamRepository, TeamRepositoryError};
use crate::domain::{Team, TeamMember, TeamName, User};

use super::diesel_error_mapping::{StorageFailure, classify_diesel_error, pool_error_message};
use super::models::{NewTeamRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{teams, users};

/// Diesel-backed implementation of the `TeamRepository` port.
#[derive(Clone)]
pub struct DieselTeamRepository {
    pool: DbPool,
}

impl DieselTeamRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TeamRepositoryError {
    TeamRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, team_name: &TeamName) -> TeamRepositoryError {
    match classify_diesel_error(error) {
        StorageFailure::Connection(message) => TeamRepositoryError::connection(message),
        StorageFailure::UniqueViolation { .. } => TeamRepositoryError::duplicate(team_name.as_str()),
        StorageFailure::ForeignKeyViolation { .. } => {
            TeamRepositoryError::unknown_team(team_name.as_str())
        }
        StorageFailure::Query(message) => TeamRepositoryError::query(message),
    }
}

/// Build member rows, keeping the last entry when an id repeats.
///
/// PostgreSQL rejects an `ON CONFLICT DO UPDATE` batch that touches the same
/// row twice.
fn member_rows<'a>(team_name: &'a TeamName, members: &'a [TeamMember]) -> Vec<NewUserRow<'a>> {
    let unique: BTreeMap<&str, &TeamMember> = members
        .iter()
        .map(|member| (member.user_id.as_str(), member))
        .collect();
    unique
        .into_values()
        .map(|member| NewUserRow {
            user_id: member.user_id.as_str(),
            username: member.username.as_str(),
            team_name: team_name.as_str(),
            is_active: member.is_active,
        })
        .collect()
}

pub(crate) async fn upsert_user_rows(
    conn: &mut AsyncPgConnection,
    rows: &[NewUserRow<'_>],
) -> Result<(), diesel::result::Error> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(users::table)
        .values(rows)
        .on_conflict(users::user_id)
        .do_update()
        .set((
            users::username.eq(excluded(users::username)),
            users::team_name.eq(excluded(users::team_name)),
            users::is_active.eq(excluded(users::is_active)),
        ))
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl TeamRepository for DieselTeamRepository {
    async fn create_with_members(&self, team: &Team) -> Result<(), TeamRepositoryError> {
        let rows = member_rows(&team.name, &team.members);
        let name = team.name.as_str();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let created = conn
            .transaction(|conn| {
                async move {
                    let inserted = diesel::insert_into(teams::table)
                        .values(&NewTeamRow { name })
                        .on_conflict(teams::name)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                    if inserted == 0 {
                        return Ok(false);
                    }
                    upsert_user_rows(conn, &rows).await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, &team.name))?;

        if created {
            Ok(())
        } else {
            Err(TeamRepositoryError::duplicate(name))
        }
    }

    async fn add_members(
        &self,
        team_name: &TeamName,
        members: &[TeamMember],
    ) -> Result<(), TeamRepositoryError> {
        let rows = member_rows(team_name, members);
        let name = team_name.as_str();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction(|conn| {
                async move {
                    let existing: Option<String> = teams::table
                        .find(name)
                        .select(teams::name)
                        .for_share()
                        .first(conn)
                        .await
                        .optional()?;
                    if existing.is_none() {
                        return Ok(false);
                    }
                    upsert_user_rows(conn, &rows).await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, team_name))?;

        if found {
            Ok(())
        } else {
            Err(TeamRepositoryError::unknown_team(name))
        }
    }

    async fn find_with_members(
        &self,
        team_name: &TeamName,
    ) -> Result<Option<Team>, TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let existing: Option<String> = teams::table
            .find(team_name.as_str())
            .select(teams::name)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, team_name))?;
        if existing.is_none() {
            return Ok(None);
        }

        let rows: Vec<UserRow> = users::table
            .filter(users::team_name.eq(team_name.as_str()))
            .order(users::user_id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, team_name))?;
        let members = rows
            .into_iter()
            .map(|row| User::try_from(row).map(TeamMember::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| TeamRepositoryError::query(err.to_string()))?;

        Ok(Some(Team {
            name: team_name.clone(),
            members,
        }))
    }
}
