//! Translation of driven-port failures into domain [`Error`]s.
//!
//! Connection failures become `service_unavailable`; query failures become
//! `internal_error`. Constraint outcomes keep their business meaning and carry
//! a machine readable `details.code`.

use serde_json::json;

use super::Error;
use super::ports::{
    DeactivationRepositoryError, PullRequestRepositoryError, TeamRepositoryError,
    UserRepositoryError,
};

pub(crate) fn coded(error: Error, code: &str) -> Error {
    error.with_details(json!({ "code": code }))
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::UnknownTeam { name } => {
            coded(Error::not_found(format!("team {name} not found")), "not_found")
        }
    }
}

pub(crate) fn map_team_error(error: TeamRepositoryError) -> Error {
    match error {
        TeamRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("team repository unavailable: {message}"))
        }
        TeamRepositoryError::Query { message } => {
            Error::internal(format!("team repository error: {message}"))
        }
        TeamRepositoryError::Duplicate { name } => {
            coded(Error::conflict(format!("team {name} already exists")), "team_exists")
        }
        TeamRepositoryError::UnknownTeam { name } => {
            coded(Error::not_found(format!("team {name} not found")), "not_found")
        }
    }
}

pub(crate) fn map_pull_request_error(error: PullRequestRepositoryError) -> Error {
    match error {
        PullRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("pull request repository unavailable: {message}"))
        }
        PullRequestRepositoryError::Query { message } => {
            Error::internal(format!("pull request repository error: {message}"))
        }
        PullRequestRepositoryError::Duplicate { id } => coded(
            Error::conflict(format!("pull request {id} already exists")),
            "pr_exists",
        ),
    }
}

pub(crate) fn map_deactivation_error(error: DeactivationRepositoryError) -> Error {
    match error {
        DeactivationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("deactivation repository unavailable: {message}"))
        }
        DeactivationRepositoryError::Query { message } => {
            Error::internal(format!("deactivation failed: {message}"))
        }
    }
}
