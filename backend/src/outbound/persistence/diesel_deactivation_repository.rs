//! PostgreSQL-backed `DeactivationRepository` implementation using Diesel ORM.
//!
//! The cascade runs in one transaction: a team-scoped bulk deactivation that
//! selects members by their team at write time, discovery of the open pull
//! requests reviewed by the deactivated users, and the rebuild of each
//! affected reviewer set via [`cascade_reviewers`]. Dropping the future
//! before commit rolls everything back.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    DeactivationReport, DeactivationRepository, DeactivationRepositoryError,
};
use crate::domain::{PullRequestId, TeamName, User, UserId, cascade_reviewers};

use super::diesel_error_mapping::{StorageFailure, classify_diesel_error, pool_error_message};
use super::models::{InvalidRow, NewReviewerRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{pull_request_reviewers, pull_requests, users};

/// Diesel-backed implementation of the `DeactivationRepository` port.
#[derive(Clone)]
pub struct DieselDeactivationRepository {
    pool: DbPool,
}

impl DieselDeactivationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failures raised inside the cascade transaction.
#[derive(Debug, thiserror::Error)]
enum CascadeError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
    #[error(transparent)]
    Row(#[from] InvalidRow),
}

fn map_pool_error(error: PoolError) -> DeactivationRepositoryError {
    DeactivationRepositoryError::connection(pool_error_message(error))
}

fn map_cascade_error(error: CascadeError) -> DeactivationRepositoryError {
    match error {
        CascadeError::Diesel(error) => match classify_diesel_error(error) {
            StorageFailure::Connection(message) => {
                DeactivationRepositoryError::connection(message)
            }
            StorageFailure::UniqueViolation { constraint }
            | StorageFailure::ForeignKeyViolation { constraint } => {
                DeactivationRepositoryError::query(format!(
                    "constraint {} rejected the cascade",
                    constraint.as_deref().unwrap_or("unknown")
                ))
            }
            StorageFailure::Query(message) => DeactivationRepositoryError::query(message),
        },
        CascadeError::Row(error) => DeactivationRepositoryError::query(error.to_string()),
    }
}

/// Rebuild the reviewer set of one open pull request from the author's team.
async fn repair_reviewers(
    conn: &mut AsyncPgConnection,
    pull_request_id: &str,
    author_id: &str,
) -> Result<(), CascadeError> {
    let author_team: Option<String> = users::table
        .find(author_id)
        .select(users::team_name)
        .first(conn)
        .await
        .optional()?;
    let active_team = match author_team {
        Some(team_name) => users::table
            .filter(users::team_name.eq(team_name))
            .filter(users::is_active.eq(true))
            .order(users::user_id.asc())
            .select(UserRow::as_select())
            .load::<UserRow>(conn)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let author = UserId::new(author_id).map_err(|err| {
        CascadeError::Row(InvalidRow::for_entity("pull request", err))
    })?;
    let reviewers = cascade_reviewers(&active_team, &author);

    diesel::delete(
        pull_request_reviewers::table
            .filter(pull_request_reviewers::pull_request_id.eq(pull_request_id)),
    )
    .execute(conn)
    .await?;

    let rows: Vec<NewReviewerRow<'_>> = reviewers
        .iter()
        .map(|reviewer| NewReviewerRow {
            pull_request_id,
            user_id: reviewer.as_str(),
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(pull_request_reviewers::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    debug!(
        pull_request_id,
        reviewers = rows.len(),
        "reviewer set rebuilt after deactivation"
    );
    Ok(())
}

#[async_trait]
impl DeactivationRepository for DieselDeactivationRepository {
    async fn deactivate_and_repair(
        &self,
        team_name: &TeamName,
    ) -> Result<DeactivationReport, DeactivationRepositoryError> {
        let team = team_name.as_str();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (deactivated, repaired) = conn
            .transaction(|conn| {
                async move {
                    let mut deactivated: Vec<String> = diesel::update(
                        users::table
                            .filter(users::team_name.eq(team))
                            .filter(users::is_active.eq(true)),
                    )
                    .set(users::is_active.eq(false))
                    .returning(users::user_id)
                    .get_results(conn)
                    .await?;
                    if deactivated.is_empty() {
                        return Ok((Vec::new(), Vec::new()));
                    }
                    deactivated.sort();

                    let affected: BTreeMap<String, String> = pull_requests::table
                        .inner_join(pull_request_reviewers::table)
                        .filter(pull_requests::status.eq("OPEN"))
                        .filter(pull_request_reviewers::user_id.eq_any(&deactivated))
                        .select((pull_requests::pull_request_id, pull_requests::author_id))
                        .for_update()
                        .load::<(String, String)>(conn)
                        .await?
                        .into_iter()
                        .collect();

                    let mut repaired = Vec::with_capacity(affected.len());
                    for (pull_request_id, author_id) in affected {
                        repair_reviewers(conn, &pull_request_id, &author_id).await?;
                        repaired.push(pull_request_id);
                    }
                    Ok::<_, CascadeError>((deactivated, repaired))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_cascade_error)?;

        let deactivated = deactivated
            .into_iter()
            .map(UserId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| DeactivationRepositoryError::query(err.to_string()))?;
        let repaired_pull_requests = repaired
            .into_iter()
            .map(PullRequestId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| DeactivationRepositoryError::query(err.to_string()))?;

        Ok(DeactivationReport {
            deactivated,
            repaired_pull_requests,
        })
    }
}
