//! In-process storage adapter implementing every repository port.
//!
//! Used when no database URL is configured and by the engine-level tests. A
//! single mutex guards all tables, so each port call is atomic, matching the
//! transactional guarantees of the PostgreSQL adapter. The lock is never held
//! across an `.await`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    DeactivationReport, DeactivationRepository, DeactivationRepositoryError, MergeOutcome,
    PullRequestRepository, PullRequestRepositoryError, ReplaceOutcome, TeamRepository,
    TeamRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    PullRequest, PullRequestId, PullRequestStatus, PullRequestSummary, ReviewStats, Team,
    TeamMember, TeamName, User, UserId, cascade_reviewers,
};

#[derive(Debug, Default)]
struct Tables {
    teams: BTreeSet<TeamName>,
    users: BTreeMap<UserId, User>,
    pull_requests: BTreeMap<PullRequestId, PullRequest>,
}

impl Tables {
    fn upsert_members(&mut self, team_name: &TeamName, members: &[TeamMember]) {
        for member in members {
            let user = member.clone().into_user(team_name);
            self.users.insert(user.id.clone(), user);
        }
    }

    fn active_members(&self, team_name: &TeamName) -> Vec<User> {
        self.users
            .values()
            .filter(|user| user.is_active && &user.team_name == team_name)
            .cloned()
            .collect()
    }
}

/// Shared in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryReviewStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of reviewer relations across all pull requests.
    pub fn reviewer_relation_count(&self) -> usize {
        self.lock()
            .pull_requests
            .values()
            .map(|pr| pr.reviewers.len())
            .sum()
    }

    /// Number of stored pull requests.
    pub fn pull_request_count(&self) -> usize {
        self.lock().pull_requests.len()
    }
}

#[async_trait]
impl TeamRepository for InMemoryReviewStore {
    async fn create_with_members(&self, team: &Team) -> Result<(), TeamRepositoryError> {
        let mut tables = self.lock();
        if !tables.teams.insert(team.name.clone()) {
            return Err(TeamRepositoryError::duplicate(team.name.as_str()));
        }
        tables.upsert_members(&team.name, &team.members);
        Ok(())
    }

    async fn add_members(
        &self,
        team_name: &TeamName,
        members: &[TeamMember],
    ) -> Result<(), TeamRepositoryError> {
        let mut tables = self.lock();
        if !tables.teams.contains(team_name) {
            return Err(TeamRepositoryError::unknown_team(team_name.as_str()));
        }
        tables.upsert_members(team_name, members);
        Ok(())
    }

    async fn find_with_members(
        &self,
        team_name: &TeamName,
    ) -> Result<Option<Team>, TeamRepositoryError> {
        let tables = self.lock();
        if !tables.teams.contains(team_name) {
            return Ok(None);
        }
        let members = tables
            .users
            .values()
            .filter(|user| &user.team_name == team_name)
            .cloned()
            .map(TeamMember::from)
            .collect();
        Ok(Some(Team {
            name: team_name.clone(),
            members,
        }))
    }
}

#[async_trait]
impl UserRepository for InMemoryReviewStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().users.get(id).cloned())
    }

    async fn upsert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.lock();
        if !tables.teams.contains(&user.team_name) {
            return Err(UserRepositoryError::unknown_team(user.team_name.as_str()));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn set_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut tables = self.lock();
        Ok(tables.users.get_mut(id).map(|user| {
            user.is_active = is_active;
            user.clone()
        }))
    }

    async fn list_active_by_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.lock().active_members(team_name))
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryReviewStore {
    async fn create_with_reviewers(
        &self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestRepositoryError> {
        let mut tables = self.lock();
        if tables.pull_requests.contains_key(&pull_request.id) {
            return Err(PullRequestRepositoryError::duplicate(pull_request.id.as_str()));
        }
        let missing = std::iter::once(&pull_request.author_id)
            .chain(&pull_request.reviewers)
            .find(|id| !tables.users.contains_key(*id));
        if let Some(missing) = missing {
            return Err(PullRequestRepositoryError::query(format!(
                "user {missing} does not exist"
            )));
        }
        let mut stored = pull_request.clone();
        stored.status = PullRequestStatus::Open;
        stored.merged_at = None;
        tables.pull_requests.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        Ok(self.lock().pull_requests.get(id).cloned())
    }

    async fn merge(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<MergeOutcome, PullRequestRepositoryError> {
        let mut tables = self.lock();
        match tables.pull_requests.get_mut(id) {
            Some(pr) if pr.status == PullRequestStatus::Open => {
                pr.status = PullRequestStatus::Merged;
                pr.merged_at = Some(merged_at);
                Ok(MergeOutcome::Transitioned)
            }
            _ => Ok(MergeOutcome::NotOpen),
        }
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
    ) -> Result<ReplaceOutcome, PullRequestRepositoryError> {
        let mut tables = self.lock();
        let Some(pr) = tables.pull_requests.get_mut(id) else {
            return Ok(ReplaceOutcome::NotAssigned);
        };
        if pr.status != PullRequestStatus::Open || !pr.reviewers.contains(old_reviewer) {
            return Ok(ReplaceOutcome::NotAssigned);
        }
        if pr.reviewers.contains(new_reviewer) {
            return Ok(ReplaceOutcome::AlreadyAssigned);
        }
        pr.reviewers.remove(old_reviewer);
        pr.reviewers.insert(new_reviewer.clone());
        Ok(ReplaceOutcome::Replaced)
    }

    async fn list_for_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestSummary>, PullRequestRepositoryError> {
        Ok(self
            .lock()
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(reviewer))
            .map(PullRequest::summary)
            .collect())
    }

    async fn stats(&self) -> Result<ReviewStats, PullRequestRepositoryError> {
        let tables = self.lock();
        let mut stats = ReviewStats::default();
        for pr in tables.pull_requests.values() {
            *stats.status_counts.entry(pr.status).or_default() += 1;
            for reviewer in &pr.reviewers {
                *stats.reviewer_counts.entry(reviewer.clone()).or_default() += 1;
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl DeactivationRepository for InMemoryReviewStore {
    async fn deactivate_and_repair(
        &self,
        team_name: &TeamName,
    ) -> Result<DeactivationReport, DeactivationRepositoryError> {
        let mut tables = self.lock();

        let mut deactivated = Vec::new();
        for (id, user) in &mut tables.users {
            if user.is_active && &user.team_name == team_name {
                user.is_active = false;
                deactivated.push(id.clone());
            }
        }
        if deactivated.is_empty() {
            return Ok(DeactivationReport::default());
        }
        let targets: BTreeSet<&UserId> = deactivated.iter().collect();

        let affected: Vec<(PullRequestId, UserId)> = tables
            .pull_requests
            .values()
            .filter(|pr| pr.status == PullRequestStatus::Open)
            .filter(|pr| pr.reviewers.iter().any(|r| targets.contains(r)))
            .map(|pr| (pr.id.clone(), pr.author_id.clone()))
            .collect();

        let mut repaired = Vec::with_capacity(affected.len());
        for (pr_id, author_id) in affected {
            let active_team = tables
                .users
                .get(&author_id)
                .map(|author| tables.active_members(&author.team_name))
                .unwrap_or_default();
            let reviewers = cascade_reviewers(&active_team, &author_id);
            if let Some(pr) = tables.pull_requests.get_mut(&pr_id) {
                pr.reviewers = reviewers;
            }
            repaired.push(pr_id);
        }

        Ok(DeactivationReport {
            deactivated,
            repaired_pull_requests: repaired,
        })
    }
}
