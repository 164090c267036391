//! Driving port for team and user lookups.

use async_trait::async_trait;

use crate::domain::{Error, Team, TeamName, User, UserId};

/// Read access to the team and user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Fetch a team with its members, or `not_found`.
    async fn team(&self, team_name: &TeamName) -> Result<Team, Error>;

    /// Fetch a user, or `not_found`.
    async fn user(&self, user_id: &UserId) -> Result<User, Error>;
}
