//! Team HTTP handlers.
//!
//! ```text
//! POST /team/add {"teamName":"core","members":[{"userId":"u1","username":"alice","isActive":true}]}
//! POST /team/members {"teamName":"core","members":[...]}
//! GET /team/get?team_name=core
//! POST /team/deactivate {"teamName":"core"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::DeactivationReport;
use crate::domain::{Error, Team, TeamMember, TeamName, UserId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn default_active() -> bool {
    true
}

/// Team member as sent and returned over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberBody {
    #[serde(alias = "user_id")]
    #[schema(value_type = String, example = "u1")]
    pub user_id: UserId,
    #[schema(value_type = String, example = "alice")]
    pub username: Username,
    /// Defaults to `true` when omitted.
    #[serde(alias = "is_active", default = "default_active")]
    pub is_active: bool,
}

impl From<TeamMemberBody> for TeamMember {
    fn from(body: TeamMemberBody) -> Self {
        Self {
            user_id: body.user_id,
            username: body.username,
            is_active: body.is_active,
        }
    }
}

impl From<TeamMember> for TeamMemberBody {
    fn from(member: TeamMember) -> Self {
        Self {
            user_id: member.user_id,
            username: member.username,
            is_active: member.is_active,
        }
    }
}

/// Team with members, used for creation, member additions and lookups.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamBody {
    #[serde(alias = "team_name")]
    #[schema(value_type = String, example = "core")]
    pub team_name: TeamName,
    #[serde(default)]
    pub members: Vec<TeamMemberBody>,
}

impl From<Team> for TeamBody {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.name,
            members: team.members.into_iter().map(TeamMemberBody::from).collect(),
        }
    }
}

impl From<TeamBody> for Team {
    fn from(body: TeamBody) -> Self {
        Self {
            name: body.team_name,
            members: body.members.into_iter().map(TeamMember::from).collect(),
        }
    }
}

/// Envelope for single-team responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamEnvelope {
    pub team: TeamBody,
}

/// Query string for `GET /team/get`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamQuery {
    #[serde(alias = "teamName")]
    #[param(value_type = String, example = "core")]
    pub team_name: TeamName,
}

/// Request body for `POST /team/deactivate`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateTeamBody {
    #[serde(alias = "team_name", alias = "team")]
    #[schema(value_type = String, example = "core")]
    pub team_name: TeamName,
}

/// Response body for `POST /team/deactivate`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateTeamResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[serde(flatten)]
    pub report: DeactivationReport,
}

/// Create a team together with its members.
#[utoipa::path(
    post,
    path = "/team/add",
    request_body = TeamBody,
    responses(
        (status = 201, description = "Team created", body = TeamEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Team already exists", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["teams"],
    operation_id = "createTeam"
)]
#[post("/team/add")]
pub async fn create_team(
    state: web::Data<HttpState>,
    payload: web::Json<TeamBody>,
) -> ApiResult<HttpResponse> {
    let team = state.teams.create_team(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(TeamEnvelope { team: team.into() }))
}

/// Add or move members into an existing team.
#[utoipa::path(
    post,
    path = "/team/members",
    request_body = TeamBody,
    responses(
        (status = 200, description = "Updated team", body = TeamEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown team", body = Error)
    ),
    tags = ["teams"],
    operation_id = "addTeamMembers"
)]
#[post("/team/members")]
pub async fn add_team_members(
    state: web::Data<HttpState>,
    payload: web::Json<TeamBody>,
) -> ApiResult<web::Json<TeamEnvelope>> {
    let TeamBody { team_name, members } = payload.into_inner();
    let members = members.into_iter().map(TeamMember::from).collect();
    let team = state.teams.add_members(&team_name, members).await?;
    Ok(web::Json(TeamEnvelope { team: team.into() }))
}

/// Fetch a team with all members, active or not.
#[utoipa::path(
    get,
    path = "/team/get",
    params(TeamQuery),
    responses(
        (status = 200, description = "Team", body = TeamBody),
        (status = 404, description = "Unknown team", body = Error)
    ),
    tags = ["teams"],
    operation_id = "getTeam"
)]
#[get("/team/get")]
pub async fn get_team(
    state: web::Data<HttpState>,
    query: web::Query<TeamQuery>,
) -> ApiResult<web::Json<TeamBody>> {
    let team = state.directory.team(&query.team_name).await?;
    Ok(web::Json(team.into()))
}

/// Deactivate every member of a team and repair affected open pull requests.
#[utoipa::path(
    post,
    path = "/team/deactivate",
    request_body = DeactivateTeamBody,
    responses(
        (status = 200, description = "Cascade committed", body = DeactivateTeamResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["teams"],
    operation_id = "deactivateTeam"
)]
#[post("/team/deactivate")]
pub async fn deactivate_team(
    state: web::Data<HttpState>,
    payload: web::Json<DeactivateTeamBody>,
) -> ApiResult<web::Json<DeactivateTeamResponse>> {
    let report = state.teams.deactivate_team(&payload.team_name).await?;
    Ok(web::Json(DeactivateTeamResponse {
        status: "ok".to_owned(),
        report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PullRequestId, User};
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn team_name(raw: &str) -> TeamName {
        TeamName::new(raw).expect("team name")
    }

    fn sample_team() -> Team {
        let user = User::active(
            UserId::new("u1").expect("user id"),
            Username::new("alice").expect("username"),
            team_name("core"),
        );
        Team {
            name: team_name("core"),
            members: vec![TeamMember::from(user)],
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn create_team_accepts_snake_case_and_returns_created() {
        let mut ports = MockPorts::default();
        ports
            .teams
            .expect_create_team()
            .withf(|team| team.name.as_str() == "core" && team.members.len() == 1)
            .times(1)
            .returning(|team| Ok(team));
        let app = actix_test::init_service(test_app(ports).service(create_team)).await;

        let request = actix_test::TestRequest::post()
            .uri("/team/add")
            .set_json(json!({
                "team_name": "core",
                "members": [{"user_id": "u1", "username": "alice", "is_active": true}]
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["team"]["teamName"], "core");
        assert_eq!(body["team"]["members"][0]["userId"], "u1");
        assert_eq!(body["team"]["members"][0]["isActive"], true);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_team_maps_to_conflict() {
        let mut ports = MockPorts::default();
        ports.teams.expect_create_team().returning(|_| {
            Err(Error::conflict("team core already exists")
                .with_details(json!({"code": "team_exists"})))
        });
        let app = actix_test::init_service(test_app(ports).service(create_team)).await;

        let request = actix_test::TestRequest::post()
            .uri("/team/add")
            .set_json(json!({"teamName": "core", "members": []}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "team_exists");
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_team_name_is_rejected_before_reaching_the_service() {
        let app = actix_test::init_service(test_app(MockPorts::default()).service(create_team))
            .await;

        let request = actix_test::TestRequest::post()
            .uri("/team/add")
            .set_json(json!({"teamName": "   ", "members": []}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["code"], "invalid_body");
    }

    #[rstest]
    #[actix_web::test]
    async fn get_team_reads_query_parameter() {
        let mut ports = MockPorts::default();
        ports
            .directory
            .expect_team()
            .with(eq(team_name("core")))
            .times(1)
            .returning(|_| Ok(sample_team()));
        let app = actix_test::init_service(test_app(ports).service(get_team)).await;

        let request = actix_test::TestRequest::get()
            .uri("/team/get?team_name=core")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["teamName"], "core");
        assert_eq!(body["members"][0]["username"], "alice");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_team_query_is_invalid() {
        let app =
            actix_test::init_service(test_app(MockPorts::default()).service(get_team)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/team/get").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn deactivate_reports_status_and_repairs() {
        let mut ports = MockPorts::default();
        ports
            .teams
            .expect_deactivate_team()
            .with(eq(team_name("core")))
            .times(1)
            .returning(|_| {
                Ok(DeactivationReport {
                    deactivated: vec![UserId::new("u1").expect("user id")],
                    repaired_pull_requests: vec![PullRequestId::new("pr-1").expect("pr id")],
                })
            });
        let app = actix_test::init_service(test_app(ports).service(deactivate_team)).await;

        let request = actix_test::TestRequest::post()
            .uri("/team/deactivate")
            .set_json(json!({"team": "core"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["deactivated"], json!(["u1"]));
        assert_eq!(body["repairedPullRequests"], json!(["pr-1"]));
    }
}
