//! User directory service: user upserts, activation toggles and lookups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{DirectoryQuery, TeamRepository, UserCommand, UserRepository};
use super::repository_errors::{coded, map_team_error, map_user_error};
use super::{Error, Team, TeamName, User, UserId};

fn user_not_found(user_id: &UserId) -> Error {
    coded(
        Error::not_found(format!("user {user_id} not found")),
        "not_found",
    )
}

/// Domain service implementing [`UserCommand`] and [`DirectoryQuery`].
pub struct DirectoryService<T, U> {
    teams: Arc<T>,
    users: Arc<U>,
}

impl<T, U> DirectoryService<T, U> {
    /// Build the service over the team and user repositories.
    pub fn new(teams: Arc<T>, users: Arc<U>) -> Self {
        Self { teams, users }
    }
}

#[async_trait]
impl<T, U> UserCommand for DirectoryService<T, U>
where
    T: TeamRepository,
    U: UserRepository,
{
    async fn upsert_user(&self, user: User) -> Result<User, Error> {
        self.users.upsert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, team = %user.team_name, "user upserted");
        Ok(user)
    }

    async fn set_active(&self, user_id: &UserId, is_active: bool) -> Result<User, Error> {
        let user = self
            .users
            .set_active(user_id, is_active)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(user_id))?;
        info!(user_id = %user.id, is_active, "user activation changed");
        Ok(user)
    }
}

#[async_trait]
impl<T, U> DirectoryQuery for DirectoryService<T, U>
where
    T: TeamRepository,
    U: UserRepository,
{
    async fn team(&self, team_name: &TeamName) -> Result<Team, Error> {
        self.teams
            .find_with_members(team_name)
            .await
            .map_err(map_team_error)?
            .ok_or_else(|| {
                coded(
                    Error::not_found(format!("team {team_name} not found")),
                    "not_found",
                )
            })
    }

    async fn user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockTeamRepository, MockUserRepository, UserRepositoryError};
    use crate::domain::Username;
    use rstest::rstest;

    fn alice() -> User {
        User::active(
            UserId::new("u1").expect("user id"),
            Username::new("alice").expect("username"),
            TeamName::new("core").expect("team name"),
        )
    }

    fn service(
        teams: MockTeamRepository,
        users: MockUserRepository,
    ) -> DirectoryService<MockTeamRepository, MockUserRepository> {
        DirectoryService::new(Arc::new(teams), Arc::new(users))
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_into_unknown_team_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_upsert()
            .return_once(|_| Err(UserRepositoryError::unknown_team("core")));

        let error = service(MockTeamRepository::new(), users)
            .upsert_user(alice())
            .await
            .expect_err("unknown team");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_returns_the_stored_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_upsert()
            .withf(|user: &User| user.id.as_str() == "u1" && user.team_name.as_str() == "core")
            .times(1)
            .return_once(|_| Ok(()));

        let user = service(MockTeamRepository::new(), users)
            .upsert_user(alice())
            .await
            .expect("upserted");

        assert_eq!(user, alice());
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn set_active_returns_updated_user(#[case] is_active: bool) {
        let mut users = MockUserRepository::new();
        users
            .expect_set_active()
            .withf(move |id: &UserId, flag: &bool| id.as_str() == "u1" && *flag == is_active)
            .times(1)
            .return_once(move |_, flag| Ok(Some(alice().with_active(flag))));

        let user = service(MockTeamRepository::new(), users)
            .set_active(&alice().id, is_active)
            .await
            .expect("toggled");

        assert_eq!(user.is_active, is_active);
    }

    #[rstest]
    #[tokio::test]
    async fn set_active_on_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_set_active().return_once(|_, _| Ok(None));

        let error = service(MockTeamRepository::new(), users)
            .set_active(&alice().id, false)
            .await
            .expect_err("unknown user");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_team_lookup_is_not_found() {
        let mut teams = MockTeamRepository::new();
        teams.expect_find_with_members().return_once(|_| Ok(None));

        let error = service(teams, MockUserRepository::new())
            .team(&TeamName::new("core").expect("team name"))
            .await
            .expect_err("missing team");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(UserRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn user_lookup_failures_keep_their_class(
        #[case] failure: UserRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(move |_| Err(failure));

        let error = service(MockTeamRepository::new(), users)
            .user(&alice().id)
            .await
            .expect_err("storage failure");

        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn user_lookup_returns_record() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(alice().with_active(false))));

        let user = service(MockTeamRepository::new(), users)
            .user(&alice().id)
            .await
            .expect("found");

        assert!(!user.is_active);
    }
}
