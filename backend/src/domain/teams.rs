//! Team management service.
//!
//! Owns team creation, membership upserts and the deactivation cascade. The
//! cascade is one [`DeactivationRepository`] call: the roster is selected,
//! deactivated and the affected reviewer sets repaired in a single
//! transaction, so a member moved to another team concurrently is either
//! moved first and left alone, or deactivated while still on the team.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{DeactivationReport, DeactivationRepository, TeamCommand, TeamRepository};
use super::repository_errors::{coded, map_deactivation_error, map_team_error};
use super::{Error, Team, TeamMember, TeamName};

/// Domain service implementing [`TeamCommand`].
pub struct TeamService<T, D> {
    teams: Arc<T>,
    deactivation: Arc<D>,
}

impl<T, D> TeamService<T, D> {
    /// Build the service over its repositories.
    pub fn new(teams: Arc<T>, deactivation: Arc<D>) -> Self {
        Self {
            teams,
            deactivation,
        }
    }
}

impl<T, D> TeamService<T, D>
where
    T: TeamRepository,
{
    async fn load_team(&self, team_name: &TeamName) -> Result<Team, Error> {
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
}

#[async_trait]
impl<T, D> TeamCommand for TeamService<T, D>
where
    T: TeamRepository,
    D: DeactivationRepository,
{
    async fn create_team(&self, team: Team) -> Result<Team, Error> {
        self.teams
            .create_with_members(&team)
            .await
            .map_err(map_team_error)?;
        info!(team = %team.name, members = team.members.len(), "team created");
        self.load_team(&team.name).await
    }

    async fn add_members(
        &self,
        team_name: &TeamName,
        members: Vec<TeamMember>,
    ) -> Result<Team, Error> {
        self.teams
            .add_members(team_name, &members)
            .await
            .map_err(map_team_error)?;
        info!(team = %team_name, members = members.len(), "team members upserted");
        self.load_team(team_name).await
    }

    async fn deactivate_team(&self, team_name: &TeamName) -> Result<DeactivationReport, Error> {
        let report = self
            .deactivation
            .deactivate_and_repair(team_name)
            .await
            .map_err(map_deactivation_error)?;
        if report.deactivated.is_empty() {
            info!(team = %team_name, "no active members; nothing deactivated");
        } else {
            info!(
                team = %team_name,
                deactivated = report.deactivated.len(),
                repaired = report.repaired_pull_requests.len(),
                "team deactivated"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        DeactivationRepositoryError, MockDeactivationRepository, MockTeamRepository,
        TeamRepositoryError,
    };
    use crate::domain::{PullRequestId, UserId, Username};
    use rstest::{fixture, rstest};

    type Service = TeamService<MockTeamRepository, MockDeactivationRepository>;

    struct Mocks {
        teams: MockTeamRepository,
        deactivation: MockDeactivationRepository,
    }

    impl Mocks {
        fn into_service(self) -> Service {
            TeamService::new(Arc::new(self.teams), Arc::new(self.deactivation))
        }
    }

    #[fixture]
    fn mocks() -> Mocks {
        Mocks {
            teams: MockTeamRepository::new(),
            deactivation: MockDeactivationRepository::new(),
        }
    }

    fn team_name(raw: &str) -> TeamName {
        TeamName::new(raw).expect("team name")
    }

    fn member(id: &str) -> TeamMember {
        TeamMember {
            user_id: UserId::new(id).expect("user id"),
            username: Username::new(format!("name-{id}")).expect("username"),
            is_active: true,
        }
    }

    fn core_team() -> Team {
        Team {
            name: team_name("core"),
            members: vec![member("u1"), member("u2")],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_team_returns_stored_roster(mut mocks: Mocks) {
        let stored = core_team();
        mocks
            .teams
            .expect_create_with_members()
            .withf(|team: &Team| team.name.as_str() == "core" && team.members.len() == 2)
            .times(1)
            .return_once(|_| Ok(()));
        mocks
            .teams
            .expect_find_with_members()
            .return_once(move |_| Ok(Some(stored)));

        let team = mocks
            .into_service()
            .create_team(core_team())
            .await
            .expect("team created");

        assert_eq!(team, core_team());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_team_is_conflict(mut mocks: Mocks) {
        mocks
            .teams
            .expect_create_with_members()
            .return_once(|_| Err(TeamRepositoryError::duplicate("core")));
        mocks.teams.expect_find_with_members().times(0);

        let error = mocks
            .into_service()
            .create_team(core_team())
            .await
            .expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn adding_members_to_unknown_team_is_not_found(mut mocks: Mocks) {
        mocks
            .teams
            .expect_add_members()
            .return_once(|_, _| Err(TeamRepositoryError::unknown_team("ghosts")));

        let error = mocks
            .into_service()
            .add_members(&team_name("ghosts"), vec![member("u9")])
            .await
            .expect_err("unknown team");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn deactivating_a_team_without_active_members_is_a_no_op(mut mocks: Mocks) {
        mocks
            .deactivation
            .expect_deactivate_and_repair()
            .times(1)
            .return_once(|_| Ok(DeactivationReport::default()));

        let report = mocks
            .into_service()
            .deactivate_team(&team_name("core"))
            .await
            .expect("no-op");

        assert_eq!(report, DeactivationReport::default());
    }

    #[rstest]
    #[tokio::test]
    async fn deactivation_hands_the_team_to_a_single_cascade_call(mut mocks: Mocks) {
        // The roster is selected inside the cascade; no separate read may
        // precede it.
        mocks.teams.expect_find_with_members().times(0);
        mocks
            .deactivation
            .expect_deactivate_and_repair()
            .withf(|team: &TeamName| team.as_str() == "core")
            .times(1)
            .return_once(|_| {
                Ok(DeactivationReport {
                    deactivated: vec![
                        UserId::new("u1").expect("user id"),
                        UserId::new("u2").expect("user id"),
                    ],
                    repaired_pull_requests: vec![PullRequestId::new("pr-1").expect("pr id")],
                })
            });

        let report = mocks
            .into_service()
            .deactivate_team(&team_name("core"))
            .await
            .expect("deactivated");

        assert_eq!(report.deactivated.len(), 2);
        assert_eq!(report.repaired_pull_requests.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn cascade_failure_is_service_unavailable(mut mocks: Mocks) {
        mocks
            .deactivation
            .expect_deactivate_and_repair()
            .return_once(|_| Err(DeactivationRepositoryError::connection("refused")));

        let error = mocks
            .into_service()
            .deactivate_team(&team_name("core"))
            .await
            .expect_err("storage down");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
