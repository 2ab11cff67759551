//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::configure_api;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;

use state_builders::build_http_state;

/// Assemble the application from shared state.
///
/// Record routes, probes and (in debug builds) Swagger UI at `/docs` sit
/// behind the trace middleware.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness flips once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the application name is unusable as a
/// header prefix or when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(config).map_err(|err| {
        std::io::Error::other(format!(
            "invalid application name {:?}: {err}",
            config.app_name()
        ))
    })?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr())?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    fn in_memory_state() -> web::Data<HttpState> {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("literal address"), "ledgerApp");
        build_http_state(&config).expect("valid app name")
    }

    #[rstest]
    #[case::ready("/health/ready", StatusCode::OK)]
    #[case::live("/health/live", StatusCode::OK)]
    #[case::incomes("/api/incomes", StatusCode::OK)]
    #[case::monies("/api/monies", StatusCode::OK)]
    #[case::unknown_money("/api/monies/7", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn routes_are_mounted(#[case] uri: &str, #[case] expected: StatusCode) {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = test::init_service(build_app(health, in_memory_state())).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(res.status(), expected);
        assert!(res.headers().contains_key("trace-id"));
    }

    #[cfg(debug_assertions)]
    #[actix_web::test]
    async fn openapi_document_is_served_in_debug_builds() {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            in_memory_state(),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api-docs/openapi.json").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
