//! Domain primitives, aggregates and services.
//!
//! Purpose: define the reviewer assignment model (teams, users, pull
//! requests), the pure selection rules, and the services that implement the
//! driving ports on top of the driven repository ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Team, User, PullRequest and their identifier newtypes.
//! - ReviewerPicker and the candidate pool functions.
//! - PullRequestService, TeamService, DirectoryService.

pub mod directory;
pub mod error;
mod identifier;
pub mod ports;
pub mod pull_request;
pub mod pull_requests;
mod repository_errors;
pub mod reviewer_selection;
pub mod team;
pub mod teams;
pub mod trace_id;
pub mod user;

pub use self::directory::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifier::{IDENTIFIER_MAX_LEN, IdentifierValidationError};
pub use self::pull_request::{
    PullRequest, PullRequestId, PullRequestName, PullRequestStatus, PullRequestSummary,
    ReviewStats, UnknownStatusError,
};
pub use self::pull_requests::PullRequestService;
pub use self::reviewer_selection::{
    MAX_INITIAL_REVIEWERS, ReviewerPicker, cascade_reviewers, creation_candidates,
    reassignment_candidates,
};
pub use self::team::{Team, TeamMember, TeamName};
pub use self::teams::TeamService;
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, Username};

/// HTTP header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use reviewer_service::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such pull request"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
