//! User entity.
//!
//! A user belongs to exactly one team and is either active or inactive. Only
//! active users are ever considered as reviewer candidates.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TeamName;
use super::identifier::string_identifier;

string_identifier! {
    /// Stable caller-supplied user identifier, e.g. `u1`.
    UserId, "user id"
}

string_identifier! {
    /// Human readable login name.
    Username, "username"
}

/// A user record as stored by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub team_name: TeamName,
    pub is_active: bool,
}

impl User {
    /// Build an active user.
    pub fn active(id: UserId, username: Username, team_name: TeamName) -> Self {
        Self {
            id,
            username,
            team_name,
            is_active: true,
        }
    }

    /// Return a copy with the activation flag replaced.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn active_constructor_sets_flag() {
        let user = User::active(
            UserId::new("u1").expect("user id"),
            Username::new("Alice").expect("username"),
            TeamName::new("backend").expect("team name"),
        );
        assert!(user.is_active);
        assert!(!user.with_active(false).is_active);
    }

    #[rstest]
    fn serialises_with_camel_case_keys() {
        let user = User::active(
            UserId::new("u2").expect("user id"),
            Username::new("Bob").expect("username"),
            TeamName::new("payments").expect("team name"),
        );
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(value["id"], "u2");
        assert_eq!(value["teamName"], "payments");
        assert_eq!(value["isActive"], true);
    }
}
