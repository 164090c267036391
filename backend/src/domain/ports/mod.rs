//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by storage adapters. Driving
//! ports (`*Command`, `*Query`) are implemented by the domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod deactivation_repository;
mod directory_query;
mod pull_request_command;
mod pull_request_repository;
mod review_query;
mod team_command;
mod team_repository;
mod user_command;
mod user_repository;

#[cfg(test)]
pub use deactivation_repository::MockDeactivationRepository;
pub use deactivation_repository::{
    DeactivationReport, DeactivationRepository, DeactivationRepositoryError,
};
#[cfg(test)]
pub use directory_query::MockDirectoryQuery;
pub use directory_query::DirectoryQuery;
#[cfg(test)]
pub use pull_request_command::MockPullRequestCommand;
pub use pull_request_command::{
    CreatePullRequestRequest, PullRequestCommand, ReassignReviewerRequest,
    ReassignReviewerResponse,
};
#[cfg(test)]
pub use pull_request_repository::MockPullRequestRepository;
pub use pull_request_repository::{
    MergeOutcome, PullRequestRepository, PullRequestRepositoryError, ReplaceOutcome,
};
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::ReviewQuery;
#[cfg(test)]
pub use team_command::MockTeamCommand;
pub use team_command::TeamCommand;
#[cfg(test)]
pub use team_repository::MockTeamRepository;
pub use team_repository::{TeamRepository, TeamRepositoryError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
