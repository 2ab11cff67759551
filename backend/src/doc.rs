//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every record endpoint generated for incomes and
//! monies, the health probes, and the shared record and error schemas. The
//! document backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Record};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger backend API",
        description = "CRUD endpoints for income and money records plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::incomes::create_income,
        crate::inbound::http::incomes::list_incomes,
        crate::inbound::http::incomes::get_income,
        crate::inbound::http::incomes::update_income,
        crate::inbound::http::incomes::partial_update_income,
        crate::inbound::http::incomes::delete_income,
        crate::inbound::http::monies::create_money,
        crate::inbound::http::monies::list_monies,
        crate::inbound::http::monies::get_money,
        crate::inbound::http::monies::update_money,
        crate::inbound::http::monies::partial_update_money,
        crate::inbound::http::monies::delete_money,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Record, Error, ErrorCode)),
    tags(
        (name = "incomes", description = "Income records; only the amount is mandatory"),
        (name = "monies", description = "Money records; roll and amount are mandatory"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
