//! Team aggregate.
//!
//! Membership is a denormalised view: a member is any user whose
//! `team_name` points at the team. Users belong to exactly one team, so
//! adding an existing user to a team moves them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::string_identifier;
use super::{User, UserId, Username};

string_identifier! {
    /// Unique team name.
    TeamName, "team name"
}

/// Member entry as listed on a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: UserId,
    pub username: Username,
    pub is_active: bool,
}

impl TeamMember {
    /// Materialise the member as a user of `team_name`.
    pub fn into_user(self, team_name: &TeamName) -> User {
        User {
            id: self.user_id,
            username: self.username,
            team_name: team_name.clone(),
            is_active: self.is_active,
        }
    }
}

impl From<User> for TeamMember {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}

/// A team with its current members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: TeamName,
    pub members: Vec<TeamMember>,
}

impl Team {
    /// Ids of members currently marked active.
    pub fn active_member_ids(&self) -> impl Iterator<Item = &UserId> {
        self.members
            .iter()
            .filter(|member| member.is_active)
            .map(|member| &member.user_id)
    }
}
