//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::RecordStore;
use crate::inbound::http::configure_api;
use crate::inbound::http::headers::EntityAlerts;
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::memory::InMemoryRecordStore;

/// Application name used for alert headers in tests.
pub const TEST_APP_NAME: &str = "ledgerApp";

/// Build the API over the given stores, wrapped in the trace middleware.
pub fn app_with_stores(
    incomes: Arc<dyn RecordStore>,
    monies: Arc<dyn RecordStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let alerts = EntityAlerts::new(TEST_APP_NAME).expect("test app name is a valid header");
    App::new()
        .app_data(web::Data::new(HttpState::new(incomes, monies, alerts)))
        .wrap(Trace)
        .configure(configure_api)
}

/// Build the API over fresh in-memory stores.
pub fn in_memory_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with_stores(
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(InMemoryRecordStore::new()),
    )
}
