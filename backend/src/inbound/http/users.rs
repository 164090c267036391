//! User HTTP handlers.
//!
//! ```text
//! POST /users/upsert {"userId":"u1","username":"alice","teamName":"core","isActive":true}
//! POST /users/setIsActive {"userId":"u1","isActive":false}
//! GET /users/get?user_id=u1
//! GET /users/getReview?user_id=u1
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, PullRequestSummary, TeamName, User, UserId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn default_active() -> bool {
    true
}

/// User record as sent and returned over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[serde(alias = "user_id")]
    #[schema(value_type = String, example = "u1")]
    pub user_id: UserId,
    #[schema(value_type = String, example = "alice")]
    pub username: Username,
    #[serde(alias = "team_name")]
    #[schema(value_type = String, example = "core")]
    pub team_name: TeamName,
    #[serde(alias = "is_active", default = "default_active")]
    pub is_active: bool,
}

impl From<UserBody> for User {
    fn from(body: UserBody) -> Self {
        Self {
            id: body.user_id,
            username: body.username,
            team_name: body.team_name,
            is_active: body.is_active,
        }
    }
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

/// Envelope for single-user responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserBody,
}

/// Request body for `POST /users/setIsActive`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveBody {
    #[serde(alias = "user_id")]
    #[schema(value_type = String, example = "u1")]
    pub user_id: UserId,
    #[serde(alias = "is_active")]
    pub is_active: bool,
}

/// Query string naming a user.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    #[serde(alias = "userId")]
    #[param(value_type = String, example = "u1")]
    pub user_id: UserId,
}

/// Pull requests a user currently reviews, or reviewed before a merge.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListBody {
    #[schema(value_type = String, example = "u1")]
    pub user_id: UserId,
    pub pull_requests: Vec<PullRequestSummary>,
}

/// Create or replace a user, moving them between teams if needed.
#[utoipa::path(
    post,
    path = "/users/upsert",
    request_body = UserBody,
    responses(
        (status = 200, description = "Stored user", body = UserEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown team", body = Error)
    ),
    tags = ["users"],
    operation_id = "upsertUser"
)]
#[post("/users/upsert")]
pub async fn upsert_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserBody>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let user = state.users.upsert_user(payload.into_inner().into()).await?;
    Ok(web::Json(UserEnvelope { user: user.into() }))
}

/// Flip a user's activation flag. Existing assignments are left alone.
#[utoipa::path(
    post,
    path = "/users/setIsActive",
    request_body = SetActiveBody,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "setUserActive"
)]
#[post("/users/setIsActive")]
pub async fn set_user_active(
    state: web::Data<HttpState>,
    payload: web::Json<SetActiveBody>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let SetActiveBody { user_id, is_active } = payload.into_inner();
    let user = state.users.set_active(&user_id, is_active).await?;
    Ok(web::Json(UserEnvelope { user: user.into() }))
}

/// Fetch a single user.
#[utoipa::path(
    get,
    path = "/users/get",
    params(UserQuery),
    responses(
        (status = 200, description = "User", body = UserEnvelope),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/get")]
pub async fn get_user(
    state: web::Data<HttpState>,
    query: web::Query<UserQuery>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let user = state.directory.user(&query.user_id).await?;
    Ok(web::Json(UserEnvelope { user: user.into() }))
}

/// List pull requests on which the user is a reviewer.
///
/// An unknown user simply has no reviews.
#[utoipa::path(
    get,
    path = "/users/getReview",
    params(UserQuery),
    responses(
        (status = 200, description = "Reviewed pull requests", body = ReviewListBody),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["users"],
    operation_id = "listReviews"
)]
#[get("/users/getReview")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    query: web::Query<UserQuery>,
) -> ApiResult<web::Json<ReviewListBody>> {
    let UserQuery { user_id } = query.into_inner();
    let pull_requests = state.reviews.reviewed_by(&user_id).await?;
    Ok(web::Json(ReviewListBody {
        user_id,
        pull_requests,
    }))
}
