//! Driving port for team management.

use async_trait::async_trait;

use crate::domain::{Error, Team, TeamMember, TeamName};

use super::DeactivationReport;

/// Team creation, membership and bulk deactivation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamCommand: Send + Sync {
    /// Create a team and upsert its members in one step.
    ///
    /// # Errors
    ///
    /// `conflict` when the team name is taken.
    async fn create_team(&self, team: Team) -> Result<Team, Error>;

    /// Upsert members into an existing team and return the refreshed team.
    ///
    /// # Errors
    ///
    /// `not_found` when the team does not exist.
    async fn add_members(
        &self,
        team_name: &TeamName,
        members: Vec<TeamMember>,
    ) -> Result<Team, Error>;

    /// Deactivate every active member and rebuild the reviewer sets of open
    /// pull requests that referenced them.
    ///
    /// A team without active members is a no-op.
    async fn deactivate_team(&self, team_name: &TeamName) -> Result<DeactivationReport, Error>;
}
