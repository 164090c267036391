//! Driving port for pull request lifecycle operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, PullRequest, PullRequestId, PullRequestName, UserId};

/// Request to open a pull request and assign its initial reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    #[serde(alias = "pull_request_id")]
    pub pull_request_id: PullRequestId,
    #[serde(alias = "pull_request_name")]
    pub pull_request_name: PullRequestName,
    #[serde(alias = "author_id")]
    pub author_id: UserId,
}

/// Request to swap one reviewer on an open pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignReviewerRequest {
    #[serde(alias = "pull_request_id", alias = "id")]
    pub pull_request_id: PullRequestId,
    #[serde(alias = "old_reviewer_id", alias = "old_user_id", alias = "reviewerId")]
    pub old_reviewer_id: UserId,
}

/// Outcome of a reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignReviewerResponse {
    /// Pull request state after the swap.
    pub pull_request: PullRequest,
    /// Reviewer that replaced the old one.
    pub replaced_by: UserId,
}

/// Driving port for creating, merging and reassigning pull requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestCommand: Send + Sync {
    /// Open a pull request and pick up to two reviewers from the author's
    /// active teammates.
    ///
    /// # Errors
    ///
    /// - `not_found` when the author does not exist.
    /// - `precondition_failed` when the author is inactive.
    /// - `conflict` when the id is already taken.
    async fn create(&self, request: CreatePullRequestRequest) -> Result<PullRequest, Error>;

    /// Merge a pull request. Merging an already merged pull request returns
    /// it unchanged.
    async fn merge(&self, id: &PullRequestId) -> Result<PullRequest, Error>;

    /// Replace one reviewer with a random active teammate of that reviewer.
    ///
    /// # Errors
    ///
    /// - `not_found` when the pull request or the old reviewer is unknown.
    /// - `precondition_failed` when the pull request is merged or the old
    ///   reviewer is not assigned.
    /// - `resource_exhausted` when no replacement candidate exists.
    /// - `conflict` when a concurrent reassignment picked the same reviewer.
    async fn reassign(
        &self,
        request: ReassignReviewerRequest,
    ) -> Result<ReassignReviewerResponse, Error>;
}
