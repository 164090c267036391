//! Shared fixtures for engine-level tests over the in-memory store.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use reviewer_service::domain::ports::{CreatePullRequestRequest, TeamCommand};
use reviewer_service::domain::{
    DirectoryService, PullRequestId, PullRequestName, PullRequestService, ReviewerPicker, Team,
    TeamMember, TeamName, TeamService, UserId, Username,
};
use reviewer_service::outbound::memory::InMemoryReviewStore;

pub type Store = InMemoryReviewStore;

pub struct FixedClock;

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0)
        .single()
        .expect("valid fixed instant")
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        fixed_instant().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixed_instant()
    }
}

/// The three domain services wired over one shared store.
pub struct Engine {
    pub store: Arc<Store>,
    pub pull_requests: PullRequestService<Store, Store>,
    pub teams: TeamService<Store, Store>,
    pub directory: DirectoryService<Store, Store>,
}

impl Engine {
    pub fn seeded(seed: u64) -> Self {
        let store = Arc::new(InMemoryReviewStore::new());
        Self {
            pull_requests: PullRequestService::new(
                store.clone(),
                store.clone(),
                Arc::new(ReviewerPicker::seeded(seed)),
                Arc::new(FixedClock),
            ),
            teams: TeamService::new(store.clone(), store.clone()),
            directory: DirectoryService::new(store.clone(), store.clone()),
            store,
        }
    }

    /// Create `name` with active members `ids`.
    pub async fn team(&self, name: &str, ids: &[&str]) {
        self.teams
            .create_team(Team {
                name: team_name(name),
                members: ids.iter().map(|id| member(id, true)).collect(),
            })
            .await
            .expect("team created");
    }
}

pub fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("user id")
}

pub fn pr_id(raw: &str) -> PullRequestId {
    PullRequestId::new(raw).expect("pull request id")
}

pub fn team_name(raw: &str) -> TeamName {
    TeamName::new(raw).expect("team name")
}

pub fn member(id: &str, is_active: bool) -> TeamMember {
    TeamMember {
        user_id: uid(id),
        username: Username::new(format!("user-{id}")).expect("username"),
        is_active,
    }
}

pub fn create_request(id: &str, author: &str) -> CreatePullRequestRequest {
    CreatePullRequestRequest {
        pull_request_id: pr_id(id),
        pull_request_name: PullRequestName::new(format!("Change {id}")).expect("pr name"),
        author_id: uid(author),
    }
}

pub fn ids(raw: &[&str]) -> BTreeSet<UserId> {
    raw.iter().map(|id| uid(id)).collect()
}
