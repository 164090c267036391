//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::{TeamName, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The user's team does not exist.
        UnknownTeam { name: String } => "team {name} does not exist",
    }
}

/// Storage contract for users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Create or update a user keyed by id.
    async fn upsert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Set the activation flag, returning the updated user or `None` when
    /// no such user exists.
    async fn set_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Active members of a team, ordered by user id.
    async fn list_active_by_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Vec<User>, UserRepositoryError>;
}
