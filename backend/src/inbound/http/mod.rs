//! HTTP inbound adapter exposing the REST endpoints.

pub mod error;
pub mod headers;
pub mod health;
pub mod incomes;
pub mod monies;
pub(crate) mod records;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every record endpoint together with the extractor error
/// handlers that turn malformed input into `400` responses.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    error::configure_extractors(cfg);
    incomes::configure(cfg);
    monies::configure(cfg);
}
