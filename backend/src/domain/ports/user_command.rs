//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Create-or-update and activation toggles for individual users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Create or update a user keyed by id.
    ///
    /// # Errors
    ///
    /// `not_found` when the user's team does not exist.
    async fn upsert_user(&self, user: User) -> Result<User, Error>;

    /// Flip a single user's activation flag.
    ///
    /// Deactivating one user does not touch existing reviewer assignments.
    async fn set_active(&self, user_id: &UserId, is_active: bool) -> Result<User, Error>;
}
