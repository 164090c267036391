//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the request and response bodies they exchange. Swagger UI serves it
//! in debug builds.

use utoipa::OpenApi;

use crate::domain::ports::{
    CreatePullRequestRequest, DeactivationReport, ReassignReviewerRequest,
};
use crate::domain::{Error, ErrorCode, PullRequest, PullRequestStatus, PullRequestSummary};
use crate::inbound::http::pull_requests::{MergeBody, PullRequestEnvelope, ReassignResponseBody};
use crate::inbound::http::stats::StatsBody;
use crate::inbound::http::teams::{
    DeactivateTeamBody, DeactivateTeamResponse, TeamBody, TeamEnvelope, TeamMemberBody,
};
use crate::inbound::http::users::{ReviewListBody, SetActiveBody, UserBody, UserEnvelope};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reviewer assignment API",
        description = "Teams, users and pull requests with automatic reviewer assignment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::teams::create_team,
        crate::inbound::http::teams::add_team_members,
        crate::inbound::http::teams::get_team,
        crate::inbound::http::teams::deactivate_team,
        crate::inbound::http::users::upsert_user,
        crate::inbound::http::users::set_user_active,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_reviews,
        crate::inbound::http::pull_requests::create_pull_request,
        crate::inbound::http::pull_requests::merge_pull_request,
        crate::inbound::http::pull_requests::reassign_reviewer,
        crate::inbound::http::stats::get_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PullRequest,
        PullRequestStatus,
        PullRequestSummary,
        CreatePullRequestRequest,
        ReassignReviewerRequest,
        DeactivationReport,
        MergeBody,
        PullRequestEnvelope,
        ReassignResponseBody,
        StatsBody,
        TeamBody,
        TeamMemberBody,
        TeamEnvelope,
        DeactivateTeamBody,
        DeactivateTeamResponse,
        UserBody,
        UserEnvelope,
        SetActiveBody,
        ReviewListBody,
    )),
    tags(
        (name = "teams", description = "Team directory and deactivation"),
        (name = "users", description = "User directory and review lists"),
        (name = "pull-requests", description = "Pull request lifecycle and reviewer assignment"),
        (name = "stats", description = "Assignment counters"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
