//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain types validates
//! identifiers again, so a row that somehow violates the domain rules
//! surfaces as a query error instead of a panic.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    IdentifierValidationError, PullRequest, PullRequestId, PullRequestName, PullRequestStatus,
    PullRequestSummary, TeamName, User, UserId, Username,
};

use super::schema::{pull_request_reviewers, pull_requests, teams, users};

/// Insertable struct for the teams table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub(crate) struct NewTeamRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

/// Insertable struct for upserting users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub team_name: &'a str,
    pub is_active: bool,
}

/// Row struct for reading from the pull_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PullRequestRow {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Projection used by reviewer listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PullRequestSummaryRow {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

/// Insertable struct for opening a pull request.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_requests)]
pub(crate) struct NewPullRequestRow<'a> {
    pub pull_request_id: &'a str,
    pub pull_request_name: &'a str,
    pub author_id: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for reviewer relations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_request_reviewers)]
pub(crate) struct NewReviewerRow<'a> {
    pub pull_request_id: &'a str,
    pub user_id: &'a str,
}

/// A stored row that no longer satisfies the domain rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {entity} row is invalid: {message}")]
pub(crate) struct InvalidRow {
    entity: &'static str,
    message: String,
}

impl InvalidRow {
    pub(crate) fn for_entity(entity: &'static str, error: impl std::fmt::Display) -> Self {
        Self {
            entity,
            message: error.to_string(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = InvalidRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |err: IdentifierValidationError| InvalidRow::for_entity("user", err);
        Ok(User {
            id: UserId::new(row.user_id).map_err(invalid)?,
            username: Username::new(row.username).map_err(invalid)?,
            team_name: TeamName::new(row.team_name).map_err(invalid)?,
            is_active: row.is_active,
        })
    }
}

impl PullRequestRow {
    /// Combine the row with its reviewer ids into a domain pull request.
    pub(crate) fn into_pull_request(
        self,
        reviewer_ids: Vec<String>,
    ) -> Result<PullRequest, InvalidRow> {
        let invalid = |err: IdentifierValidationError| InvalidRow::for_entity("pull request", err);
        let reviewers = reviewer_ids
            .into_iter()
            .map(UserId::new)
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(invalid)?;
        Ok(PullRequest {
            id: PullRequestId::new(self.pull_request_id).map_err(invalid)?,
            name: PullRequestName::new(self.pull_request_name).map_err(invalid)?,
            author_id: UserId::new(self.author_id).map_err(invalid)?,
            status: self
                .status
                .parse::<PullRequestStatus>()
                .map_err(|err| InvalidRow::for_entity("pull request", err))?,
            reviewers,
            created_at: self.created_at,
            merged_at: self.merged_at,
        })
    }
}

impl TryFrom<PullRequestSummaryRow> for PullRequestSummary {
    type Error = InvalidRow;

    fn try_from(row: PullRequestSummaryRow) -> Result<Self, Self::Error> {
        let invalid = |err: IdentifierValidationError| InvalidRow::for_entity("pull request", err);
        Ok(PullRequestSummary {
            id: PullRequestId::new(row.pull_request_id).map_err(invalid)?,
            name: PullRequestName::new(row.pull_request_name).map_err(invalid)?,
            author_id: UserId::new(row.author_id).map_err(invalid)?,
            status: row
                .status
                .parse::<PullRequestStatus>()
                .map_err(|err| InvalidRow::for_entity("pull request", err))?,
        })
    }
}
