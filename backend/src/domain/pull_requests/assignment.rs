//! Initial reviewer assignment.

use tracing::info;

use super::PullRequestService;
use crate::domain::ports::{CreatePullRequestRequest, PullRequestRepository, UserRepository};
use crate::domain::repository_errors::{coded, map_pull_request_error, map_user_error};
use crate::domain::{Error, MAX_INITIAL_REVIEWERS, PullRequest, creation_candidates};

impl<U, P> PullRequestService<U, P>
where
    U: UserRepository,
    P: PullRequestRepository,
{
    /// Select up to [`MAX_INITIAL_REVIEWERS`] active teammates of the author
    /// and persist the pull request together with them.
    ///
    /// The record and its reviewer rows are stored in a single port call, so
    /// a duplicate id or a storage failure leaves nothing behind. An empty
    /// pool is not an error.
    pub(super) async fn open_with_reviewers(
        &self,
        request: CreatePullRequestRequest,
    ) -> Result<PullRequest, Error> {
        let author = self
            .users
            .find_by_id(&request.author_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                coded(
                    Error::not_found(format!("author {} not found", request.author_id)),
                    "not_found",
                )
            })?;
        if !author.is_active {
            return Err(coded(
                Error::precondition_failed(format!("author {} is not active", author.id)),
                "author_inactive",
            ));
        }

        let mut pull_request = PullRequest::open(
            request.pull_request_id,
            request.pull_request_name,
            author.id.clone(),
            self.clock.utc(),
        );
        let teammates = self
            .users
            .list_active_by_team(&author.team_name)
            .await
            .map_err(map_user_error)?;
        let candidates = creation_candidates(&teammates, &author.id);
        if candidates.is_empty() {
            info!(
                pull_request_id = %pull_request.id,
                team = %author.team_name,
                "no reviewer candidates; pull request opened without reviewers"
            );
        }
        pull_request.reviewers = self
            .picker
            .sample(candidates, MAX_INITIAL_REVIEWERS)
            .into_iter()
            .collect();

        self.pull_requests
            .create_with_reviewers(&pull_request)
            .await
            .map_err(map_pull_request_error)?;

        info!(
            pull_request_id = %pull_request.id,
            author_id = %pull_request.author_id,
            reviewers = pull_request.reviewers.len(),
            "pull request opened"
        );
        Ok(pull_request)
    }
}
