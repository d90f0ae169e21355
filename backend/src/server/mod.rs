//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, HttpServer, web};

use questionnaire_backend::Trace;
#[cfg(debug_assertions)]
use questionnaire_backend::doc::ApiDoc;
use questionnaire_backend::inbound::http::configure;
use questionnaire_backend::inbound::http::cors::cors_layer;
use questionnaire_backend::inbound::http::health::{HealthState, live, ready};
use questionnaire_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors: Cors,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors)
        .wrap(NormalizePath::new(TrailingSlash::Trim))
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and start serving.
///
/// Marks `health_state` ready once the socket is bound; the returned
/// [`Server`] must be awaited to drive it.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        db_pool,
        caller,
        cors_origins,
    } = config;
    let http_state = web::Data::new(build_http_state(&db_pool, caller));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            cors_layer(&cors_origins),
        )
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
