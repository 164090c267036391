//! Port for pull request and reviewer-relation persistence.
//!
//! State transitions are conditioned updates whose outcome is derived from
//! the affected-row count, which is what keeps merges and reassignments on the
//! same pull request linearizable without in-process locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PullRequest, PullRequestId, PullRequestSummary, ReviewStats, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pull request repository adapters.
    pub enum PullRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "pull request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pull request repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { id: String } => "pull request record {id} already exists",
    }
}

/// Result of the conditioned OPEN to MERGED update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// This call performed the transition.
    Transitioned,
    /// No open pull request matched; it is missing or already merged.
    NotOpen,
}

/// Result of the conditioned reviewer swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// Exactly one relation row was rewritten.
    Replaced,
    /// No relation matched, or the pull request is no longer open.
    NotAssigned,
    /// The replacement already reviews the pull request; a concurrent
    /// reassignment picked it first.
    AlreadyAssigned,
}

/// Storage contract for pull requests and their reviewer relations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Insert the open pull request row followed by one relation row per
    /// entry in `pull_request.reviewers`, all in one transaction.
    ///
    /// A duplicate id must surface as [`PullRequestRepositoryError::Duplicate`]
    /// from the pull request insert itself. On any failure nothing is stored.
    async fn create_with_reviewers(
        &self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestRepositoryError>;

    /// Fetch a pull request with its reviewer set.
    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError>;

    /// Move an open pull request to merged, stamping `merged_at`.
    async fn merge(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<MergeOutcome, PullRequestRepositoryError>;

    /// Swap `old_reviewer` for `new_reviewer`, only while the pull request is
    /// open and `old_reviewer` is still assigned.
    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
    ) -> Result<ReplaceOutcome, PullRequestRepositoryError>;

    /// Every pull request, in any status, reviewed by `reviewer`, ordered by id.
    async fn list_for_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestSummary>, PullRequestRepositoryError>;

    /// Assignment and status counters.
    async fn stats(&self) -> Result<ReviewStats, PullRequestRepositoryError>;
}
