//! Single reviewer replacement.

use tracing::info;

use super::PullRequestService;
use crate::domain::ports::{
    PullRequestRepository, ReassignReviewerRequest, ReassignReviewerResponse, ReplaceOutcome,
    UserRepository,
};
use crate::domain::repository_errors::{coded, map_pull_request_error, map_user_error};
use crate::domain::{Error, PullRequestId, UserId, reassignment_candidates};

fn not_assigned(pull_request_id: &PullRequestId, reviewer: &UserId) -> Error {
    coded(
        Error::precondition_failed(format!(
            "reviewer {reviewer} is not assigned to pull request {pull_request_id}"
        )),
        "not_assigned",
    )
}

impl<U, P> PullRequestService<U, P>
where
    U: UserRepository,
    P: PullRequestRepository,
{
    /// Swap `old_reviewer_id` for a random active teammate of theirs.
    ///
    /// Preconditions are checked against a snapshot, then re-checked by the
    /// conditioned storage update, so a racing merge or reassignment cannot
    /// slip a stale write through.
    pub(super) async fn replace_reviewer(
        &self,
        request: ReassignReviewerRequest,
    ) -> Result<ReassignReviewerResponse, Error> {
        let ReassignReviewerRequest {
            pull_request_id,
            old_reviewer_id,
        } = request;

        let pull_request = self.find_existing(&pull_request_id).await?;
        if pull_request.is_merged() {
            return Err(coded(
                Error::precondition_failed(format!(
                    "pull request {pull_request_id} is merged"
                )),
                "pr_merged",
            ));
        }
        if !pull_request.has_reviewer(&old_reviewer_id) {
            return Err(not_assigned(&pull_request_id, &old_reviewer_id));
        }

        let old_reviewer = self
            .users
            .find_by_id(&old_reviewer_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                coded(
                    Error::not_found(format!("reviewer {old_reviewer_id} not found")),
                    "not_found",
                )
            })?;
        let teammates = self
            .users
            .list_active_by_team(&old_reviewer.team_name)
            .await
            .map_err(map_user_error)?;
        let candidates = reassignment_candidates(&teammates, &old_reviewer_id, &pull_request);
        let Some(replacement) = self.picker.choose(&candidates) else {
            return Err(coded(
                Error::resource_exhausted(format!(
                    "no active replacement for {old_reviewer_id} in team {}",
                    old_reviewer.team_name
                )),
                "no_candidate",
            ));
        };

        let outcome = self
            .pull_requests
            .replace_reviewer(&pull_request_id, &old_reviewer_id, &replacement)
            .await
            .map_err(map_pull_request_error)?;
        match outcome {
            ReplaceOutcome::Replaced => {}
            ReplaceOutcome::NotAssigned => {
                return Err(not_assigned(&pull_request_id, &old_reviewer_id));
            }
            ReplaceOutcome::AlreadyAssigned => {
                return Err(coded(
                    Error::precondition_failed(format!(
                        "reviewer {replacement} was assigned to pull request \
                         {pull_request_id} concurrently"
                    )),
                    "reviewer_taken",
                ));
            }
        }

        info!(
            pull_request_id = %pull_request_id,
            old_reviewer = %old_reviewer_id,
            new_reviewer = %replacement,
            "reviewer reassigned"
        );
        let pull_request = self.find_existing(&pull_request_id).await?;
        Ok(ReassignReviewerResponse {
            pull_request,
            replaced_by: replacement,
        })
    }
}
