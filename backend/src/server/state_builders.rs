//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use reviewer_service::domain::ports::{
    DeactivationRepository, PullRequestRepository, TeamRepository, UserRepository,
};
use reviewer_service::domain::{
    DirectoryService, PullRequestService, ReviewerPicker, TeamService,
};
use reviewer_service::inbound::http::state::{HttpState, HttpStatePorts};
use reviewer_service::outbound::memory::InMemoryReviewStore;
use reviewer_service::outbound::persistence::{
    DieselDeactivationRepository, DieselPullRequestRepository, DieselTeamRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Repository adapters for every driven port.
struct Repositories<T, U, P, D> {
    teams: Arc<T>,
    users: Arc<U>,
    pull_requests: Arc<P>,
    deactivation: Arc<D>,
}

fn build_picker(seed: Option<u64>) -> ReviewerPicker {
    match seed {
        Some(seed) => {
            info!(seed, "reviewer selection seeded");
            ReviewerPicker::seeded(seed)
        }
        None => ReviewerPicker::from_entropy(),
    }
}

fn wire_services<T, U, P, D>(
    repos: Repositories<T, U, P, D>,
    picker: ReviewerPicker,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    T: TeamRepository + 'static,
    U: UserRepository + 'static,
    P: PullRequestRepository + 'static,
    D: DeactivationRepository + 'static,
{
    let Repositories {
        teams,
        users,
        pull_requests,
        deactivation,
    } = repos;
    let pull_request_service = Arc::new(PullRequestService::new(
        users.clone(),
        pull_requests,
        Arc::new(picker),
        clock,
    ));
    let team_service = Arc::new(TeamService::new(teams.clone(), deactivation));
    let directory_service = Arc::new(DirectoryService::new(teams, users));

    HttpState::new(HttpStatePorts {
        pull_requests: pull_request_service.clone(),
        reviews: pull_request_service,
        teams: team_service,
        directory: directory_service.clone(),
        users: directory_service,
    })
}

/// Build HTTP state over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let picker = build_picker(config.rng_seed);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let state = match &config.db_pool {
        Some(pool) => wire_services(
            Repositories {
                teams: Arc::new(DieselTeamRepository::new(pool.clone())),
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                pull_requests: Arc::new(DieselPullRequestRepository::new(pool.clone())),
                deactivation: Arc::new(DieselDeactivationRepository::new(pool.clone())),
            },
            picker,
            clock,
        ),
        None => {
            info!("no database configured; state is kept in memory");
            let store = Arc::new(InMemoryReviewStore::new());
            wire_services(
                Repositories {
                    teams: store.clone(),
                    users: store.clone(),
                    pull_requests: store.clone(),
                    deactivation: store,
                },
                picker,
                clock,
            )
        }
    };
    web::Data::new(state)
}
