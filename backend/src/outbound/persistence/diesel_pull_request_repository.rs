//! PostgreSQL-backed `PullRequestRepository` implementation using Diesel ORM.
//!
//! Creation writes the pull request and its reviewer rows in one
//! transaction. Merge and reviewer replacement are conditioned writes. Merge
//! filters on `status = 'OPEN'`; replacement locks the pull request row first
//! so it serialises against a concurrent merge, then rewrites exactly the
//! `(pull_request_id, old_reviewer)` relation. A replacement that already
//! reviews the pull request is reported rather than surfaced as a conflict.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{
    MergeOutcome, PullRequestRepository, PullRequestRepositoryError, ReplaceOutcome,
};
use crate::domain::{
    PullRequest, PullRequestId, PullRequestStatus, PullRequestSummary, ReviewStats, UserId,
};

use super::diesel_error_mapping::{StorageFailure, classify_diesel_error, pool_error_message};
use super::models::{NewPullRequestRow, NewReviewerRow, PullRequestRow, PullRequestSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{pull_request_reviewers, pull_requests};

const OPEN: &str = "OPEN";
const MERGED: &str = "MERGED";

/// Diesel-backed implementation of the `PullRequestRepository` port.
#[derive(Clone)]
pub struct DieselPullRequestRepository {
    pool: DbPool,
}

impl DieselPullRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PullRequestRepositoryError {
    PullRequestRepositoryError::connection(pool_error_message(error))
}

/// Map Diesel errors; `conflicting_id` names the record a unique violation
/// refers to.
fn map_diesel_error(
    error: diesel::result::Error,
    conflicting_id: &str,
) -> PullRequestRepositoryError {
    map_storage_failure(classify_diesel_error(error), conflicting_id)
}

fn map_storage_failure(
    failure: StorageFailure,
    conflicting_id: &str,
) -> PullRequestRepositoryError {
    match failure {
        StorageFailure::Connection(message) => PullRequestRepositoryError::connection(message),
        StorageFailure::UniqueViolation { .. } => {
            PullRequestRepositoryError::duplicate(conflicting_id)
        }
        StorageFailure::ForeignKeyViolation { constraint } => {
            PullRequestRepositoryError::query(format!(
                "referenced row missing ({})",
                constraint.as_deref().unwrap_or("unknown constraint")
            ))
        }
        StorageFailure::Query(message) => PullRequestRepositoryError::query(message),
    }
}

fn count_to_u64(count: i64) -> Result<u64, PullRequestRepositoryError> {
    u64::try_from(count).map_err(|_| PullRequestRepositoryError::query("negative row count"))
}

#[async_trait]
impl PullRequestRepository for DieselPullRequestRepository {
    async fn create_with_reviewers(
        &self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = pull_request.id.as_str();
        let row = NewPullRequestRow {
            pull_request_id: id,
            pull_request_name: pull_request.name.as_str(),
            author_id: pull_request.author_id.as_str(),
            status: OPEN,
            created_at: pull_request.created_at,
        };
        let reviewer_rows: Vec<NewReviewerRow<'_>> = pull_request
            .reviewers
            .iter()
            .map(|reviewer| NewReviewerRow {
                pull_request_id: id,
                user_id: reviewer.as_str(),
            })
            .collect();

        let inserted = conn
            .transaction(|conn| {
                async move {
                    let inserted = diesel::insert_into(pull_requests::table)
                        .values(&row)
                        .on_conflict(pull_requests::pull_request_id)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                    if inserted == 0 {
                        return Ok(false);
                    }
                    if !reviewer_rows.is_empty() {
                        diesel::insert_into(pull_request_reviewers::table)
                            .values(&reviewer_rows)
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, diesel::result::Error>(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, id))?;

        if !inserted {
            return Err(PullRequestRepositoryError::duplicate(id));
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PullRequestRow> = pull_requests::table
            .find(id.as_str())
            .select(PullRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, id.as_str()))?;
        let Some(row) = row else {
            return Ok(None);
        };

        let reviewer_ids: Vec<String> = pull_request_reviewers::table
            .filter(pull_request_reviewers::pull_request_id.eq(id.as_str()))
            .order(pull_request_reviewers::user_id.asc())
            .select(pull_request_reviewers::user_id)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, id.as_str()))?;

        row.into_pull_request(reviewer_ids)
            .map(Some)
            .map_err(|err| PullRequestRepositoryError::query(err.to_string()))
    }

    async fn merge(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<MergeOutcome, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            pull_requests::table
                .filter(pull_requests::pull_request_id.eq(id.as_str()))
                .filter(pull_requests::status.eq(OPEN)),
        )
        .set((
            pull_requests::status.eq(MERGED),
            pull_requests::merged_at.eq(Some(merged_at)),
        ))
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, id.as_str()))?;

        Ok(if updated == 0 {
            MergeOutcome::NotOpen
        } else {
            MergeOutcome::Transitioned
        })
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
    ) -> Result<ReplaceOutcome, PullRequestRepositoryError> {
        let pr_id = id.as_str();
        let old_id = old_reviewer.as_str();
        let new_id = new_reviewer.as_str();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let status: Option<String> = pull_requests::table
                    .find(pr_id)
                    .select(pull_requests::status)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if status.as_deref() != Some(OPEN) {
                    return Ok(ReplaceOutcome::NotAssigned);
                }

                let taken: i64 = pull_request_reviewers::table
                    .filter(pull_request_reviewers::pull_request_id.eq(pr_id))
                    .filter(pull_request_reviewers::user_id.eq(new_id))
                    .count()
                    .get_result(conn)
                    .await?;
                if taken > 0 {
                    return Ok(ReplaceOutcome::AlreadyAssigned);
                }

                let replaced = diesel::update(
                    pull_request_reviewers::table
                        .filter(pull_request_reviewers::pull_request_id.eq(pr_id))
                        .filter(pull_request_reviewers::user_id.eq(old_id)),
                )
                .set(pull_request_reviewers::user_id.eq(new_id))
                .execute(conn)
                .await?;

                Ok(if replaced == 0 {
                    ReplaceOutcome::NotAssigned
                } else {
                    ReplaceOutcome::Replaced
                })
            }
            .scope_boxed()
        })
        .await
        .or_else(|err| match classify_diesel_error(err) {
            StorageFailure::UniqueViolation { .. } => Ok(ReplaceOutcome::AlreadyAssigned),
            failure => Err(map_storage_failure(failure, new_id)),
        })
    }

    async fn list_for_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestSummary>, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PullRequestSummaryRow> = pull_requests::table
            .inner_join(pull_request_reviewers::table)
            .filter(pull_request_reviewers::user_id.eq(reviewer.as_str()))
            .order(pull_requests::pull_request_id.asc())
            .select(PullRequestSummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, reviewer.as_str()))?;

        rows.into_iter()
            .map(PullRequestSummary::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| PullRequestRepositoryError::query(err.to_string()))
    }

    async fn stats(&self) -> Result<ReviewStats, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (reviewer_rows, status_rows) = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let reviewer_rows: Vec<(String, i64)> = pull_request_reviewers::table
                        .group_by(pull_request_reviewers::user_id)
                        .select((pull_request_reviewers::user_id, count_star()))
                        .load(conn)
                        .await?;
                    let status_rows: Vec<(String, i64)> = pull_requests::table
                        .group_by(pull_requests::status)
                        .select((pull_requests::status, count_star()))
                        .load(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((reviewer_rows, status_rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "stats"))?;

        let mut reviewer_counts = BTreeMap::new();
        for (user_id, count) in reviewer_rows {
            let user_id = UserId::new(user_id)
                .map_err(|err| PullRequestRepositoryError::query(err.to_string()))?;
            reviewer_counts.insert(user_id, count_to_u64(count)?);
        }
        let mut status_counts = BTreeMap::new();
        for (status, count) in status_rows {
            let status = status
                .parse::<PullRequestStatus>()
                .map_err(|err| PullRequestRepositoryError::query(err.to_string()))?;
            status_counts.insert(status, count_to_u64(count)?);
        }

        Ok(ReviewStats {
            reviewer_counts,
            status_counts,
        })
    }
}
