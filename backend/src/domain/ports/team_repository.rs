//! Port for team persistence.

use async_trait::async_trait;

use crate::domain::{Team, TeamMember, TeamName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by team repository adapters.
    pub enum TeamRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "team repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "team repository query failed: {message}",
        /// A team with this name already exists.
        Duplicate { name: String } => "team {name} already exists",
        /// The referenced team does not exist.
        UnknownTeam { name: String } => "team {name} does not exist",
    }
}

/// Storage contract for teams and their member listing.
///
/// Team names are unique at the storage level; adapters must report a
/// duplicate insert as [`TeamRepositoryError::Duplicate`] from the insert
/// itself rather than from a preceding existence probe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert the team and upsert every member into it, atomically.
    async fn create_with_members(&self, team: &Team) -> Result<(), TeamRepositoryError>;

    /// Upsert members into an existing team.
    ///
    /// Fails with [`TeamRepositoryError::UnknownTeam`] when the team is
    /// missing.
    async fn add_members(
        &self,
        team_name: &TeamName,
        members: &[TeamMember],
    ) -> Result<(), TeamRepositoryError>;

    /// Fetch a team together with all of its members, ordered by user id.
    async fn find_with_members(
        &self,
        team_name: &TeamName,
    ) -> Result<Option<Team>, TeamRepositoryError>;
}
