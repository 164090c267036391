//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockDirectoryQuery, MockPullRequestCommand, MockReviewQuery, MockTeamCommand,
    MockUserCommand,
};
use crate::inbound::http::extractors::{json_config, query_config};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mock driving ports; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub pull_requests: MockPullRequestCommand,
    pub reviews: MockReviewQuery,
    pub teams: MockTeamCommand,
    pub directory: MockDirectoryQuery,
    pub users: MockUserCommand,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            pull_requests: Arc::new(self.pull_requests),
            reviews: Arc::new(self.reviews),
            teams: Arc::new(self.teams),
            directory: Arc::new(self.directory),
            users: Arc::new(self.users),
        }))
    }
}

/// App shell carrying state and extractor configuration; callers add services.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .app_data(json_config())
        .app_data(query_config())
}
