//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use reviewer_service::Trace;
#[cfg(debug_assertions)]
use reviewer_service::doc::ApiDoc;
use reviewer_service::inbound::http::extractors::{json_config, query_config};
use reviewer_service::inbound::http::health::{HealthState, live, ready};
use reviewer_service::inbound::http::pull_requests::{
    create_pull_request, merge_pull_request, reassign_reviewer,
};
use reviewer_service::inbound::http::state::HttpState;
use reviewer_service::inbound::http::stats::get_stats;
use reviewer_service::inbound::http::teams::{
    add_team_members, create_team, deactivate_team, get_team,
};
use reviewer_service::inbound::http::users::{
    get_user, list_reviews, set_user_active, upsert_user,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(create_team)
        .service(add_team_members)
        .service(get_team)
        .service(deactivate_team)
        .service(upsert_user)
        .service(set_user_active)
        .service(get_user)
        .service(list_reviews)
        .service(create_pull_request)
        .service(merge_pull_request)
        .service(reassign_reviewer)
        .service(get_stats)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
