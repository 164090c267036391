//! Pull request HTTP handlers.
//!
//! ```text
//! POST /pullRequest/create {"pullRequestId":"pr-1","pullRequestName":"Fix","authorId":"u1"}
//! POST /pullRequest/merge {"pullRequestId":"pr-1"}
//! POST /pullRequest/reassign {"pullRequestId":"pr-1","oldReviewerId":"u2"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreatePullRequestRequest, ReassignReviewerRequest};
use crate::domain::{Error, PullRequest, PullRequestId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Envelope for single pull request responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PullRequestEnvelope {
    pub pr: PullRequest,
}

/// Request body for `POST /pullRequest/merge`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeBody {
    #[serde(alias = "pull_request_id", alias = "id")]
    #[schema(value_type = String, example = "pr-1")]
    pub pull_request_id: PullRequestId,
}

/// Response body for `POST /pullRequest/reassign`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignResponseBody {
    pub pr: PullRequest,
    #[schema(value_type = String, example = "u4")]
    pub replaced_by: UserId,
}

/// Open a pull request and assign up to two reviewers from the author's team.
#[utoipa::path(
    post,
    path = "/pullRequest/create",
    request_body = CreatePullRequestRequest,
    responses(
        (status = 201, description = "Pull request opened", body = PullRequestEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown author", body = Error),
        (status = 409, description = "Pull request already exists", body = Error),
        (status = 412, description = "Author is inactive", body = Error)
    ),
    tags = ["pull-requests"],
    operation_id = "createPullRequest"
)]
#[post("/pullRequest/create")]
pub async fn create_pull_request(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePullRequestRequest>,
) -> ApiResult<HttpResponse> {
    let pr = state.pull_requests.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(PullRequestEnvelope { pr }))
}

/// Merge a pull request. Merging twice returns the stored state unchanged.
#[utoipa::path(
    post,
    path = "/pullRequest/merge",
    request_body = MergeBody,
    responses(
        (status = 200, description = "Merged pull request", body = PullRequestEnvelope),
        (status = 404, description = "Unknown pull request", body = Error)
    ),
    tags = ["pull-requests"],
    operation_id = "mergePullRequest"
)]
#[post("/pullRequest/merge")]
pub async fn merge_pull_request(
    state: web::Data<HttpState>,
    payload: web::Json<MergeBody>,
) -> ApiResult<web::Json<PullRequestEnvelope>> {
    let pr = state.pull_requests.merge(&payload.pull_request_id).await?;
    Ok(web::Json(PullRequestEnvelope { pr }))
}

/// Replace one reviewer with an active member of that reviewer's team.
#[utoipa::path(
    post,
    path = "/pullRequest/reassign",
    request_body = ReassignReviewerRequest,
    responses(
        (status = 200, description = "Reviewer replaced", body = ReassignResponseBody),
        (status = 404, description = "Unknown pull request or reviewer", body = Error),
        (status = 409, description = "No candidate available", body = Error),
        (status = 412, description = "Merged or reviewer not assigned", body = Error)
    ),
    tags = ["pull-requests"],
    operation_id = "reassignReviewer"
)]
#[post("/pullRequest/reassign")]
pub async fn reassign_reviewer(
    state: web::Data<HttpState>,
    payload: web::Json<ReassignReviewerRequest>,
) -> ApiResult<web::Json<ReassignResponseBody>> {
    let response = state.pull_requests.reassign(payload.into_inner()).await?;
    Ok(web::Json(ReassignResponseBody {
        pr: response.pull_request,
        replaced_by: response.replaced_by,
    }))
}
