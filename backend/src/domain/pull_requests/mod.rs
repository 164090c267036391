//! Pull request review workflow.
//!
//! [`PullRequestService`] implements the [`PullRequestCommand`] and
//! [`ReviewQuery`] driving ports on top of the user and pull request
//! repositories. Reviewer assignment lives in `assignment`, reviewer swaps in
//! `reassignment`; merge and the read side are small enough to sit here.

mod assignment;
mod reassignment;

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::ports::{
    CreatePullRequestRequest, MergeOutcome, PullRequestCommand, PullRequestRepository,
    ReassignReviewerRequest, ReassignReviewerResponse, ReviewQuery, UserRepository,
};
use super::repository_errors::{coded, map_pull_request_error};
use super::{
    Error, PullRequest, PullRequestId, PullRequestSummary, ReviewStats, ReviewerPicker, UserId,
};

/// Domain service driving pull request creation, merge and reassignment.
pub struct PullRequestService<U, P> {
    users: Arc<U>,
    pull_requests: Arc<P>,
    picker: Arc<ReviewerPicker>,
    clock: Arc<dyn Clock>,
}

impl<U, P> PullRequestService<U, P> {
    /// Build the service over its repositories, randomness source and clock.
    pub fn new(
        users: Arc<U>,
        pull_requests: Arc<P>,
        picker: Arc<ReviewerPicker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            pull_requests,
            picker,
            clock,
        }
    }
}

impl<U, P> PullRequestService<U, P>
where
    U: UserRepository,
    P: PullRequestRepository,
{
    async fn find_existing(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        self.pull_requests
            .find_by_id(id)
            .await
            .map_err(map_pull_request_error)?
            .ok_or_else(|| {
                coded(
                    Error::not_found(format!("pull request {id} not found")),
                    "not_found",
                )
            })
    }

    async fn merge_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        let current = self.find_existing(id).await?;
        if current.is_merged() {
            return Ok(current);
        }

        let outcome = self
            .pull_requests
            .merge(id, self.clock.utc())
            .await
            .map_err(map_pull_request_error)?;
        match outcome {
            MergeOutcome::Transitioned => info!(pull_request_id = %id, "pull request merged"),
            MergeOutcome::NotOpen => {
                debug!(pull_request_id = %id, "pull request merged concurrently");
            }
        }
        self.find_existing(id).await
    }
}

#[async_trait]
impl<U, P> PullRequestCommand for PullRequestService<U, P>
where
    U: UserRepository,
    P: PullRequestRepository,
{
    async fn create(&self, request: CreatePullRequestRequest) -> Result<PullRequest, Error> {
        self.open_with_reviewers(request).await
    }

    async fn merge(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        self.merge_pull_request(id).await
    }

    async fn reassign(
        &self,
        request: ReassignReviewerRequest,
    ) -> Result<ReassignReviewerResponse, Error> {
        self.replace_reviewer(request).await
    }
}

#[async_trait]
impl<U, P> ReviewQuery for PullRequestService<U, P>
where
    U: UserRepository,
    P: PullRequestRepository,
{
    async fn reviewed_by(&self, user_id: &UserId) -> Result<Vec<PullRequestSummary>, Error> {
        self.pull_requests
            .list_for_reviewer(user_id)
            .await
            .map_err(map_pull_request_error)
    }

    async fn stats(&self) -> Result<ReviewStats, Error> {
        self.pull_requests
            .stats()
            .await
            .map_err(map_pull_request_error)
    }
}
