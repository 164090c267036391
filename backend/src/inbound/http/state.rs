//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DirectoryQuery, PullRequestCommand, ReviewQuery, TeamCommand, UserCommand,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub pull_requests: Arc<dyn PullRequestCommand>,
    pub reviews: Arc<dyn ReviewQuery>,
    pub teams: Arc<dyn TeamCommand>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub users: Arc<dyn UserCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub pull_requests: Arc<dyn PullRequestCommand>,
    pub reviews: Arc<dyn ReviewQuery>,
    pub teams: Arc<dyn TeamCommand>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub users: Arc<dyn UserCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use reviewer_service::domain::{
    ///     DirectoryService, PullRequestService, ReviewerPicker, TeamService,
    /// };
    /// use reviewer_service::inbound::http::state::{HttpState, HttpStatePorts};
    /// use reviewer_service::outbound::memory::InMemoryReviewStore;
    ///
    /// let store = Arc::new(InMemoryReviewStore::new());
    /// let pull_requests = Arc::new(PullRequestService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     Arc::new(ReviewerPicker::from_entropy()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let teams = Arc::new(TeamService::new(store.clone(), store.clone()));
    /// let directory = Arc::new(DirectoryService::new(store.clone(), store));
    /// let state = HttpState::new(HttpStatePorts {
    ///     pull_requests: pull_requests.clone(),
    ///     reviews: pull_requests,
    ///     teams,
    ///     directory: directory.clone(),
    ///     users: directory,
    /// });
    /// let _teams = state.teams.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            pull_requests,
            reviews,
            teams,
            directory,
            users,
        } = ports;
        Self {
            pull_requests,
            reviews,
            teams,
            directory,
            users,
        }
    }
}
