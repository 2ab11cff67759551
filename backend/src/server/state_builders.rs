//! Builders for the HTTP state and its record stores.

use std::sync::Arc;

use actix_web::http::header::InvalidHeaderName;
use actix_web::web;
use tracing::{info, warn};

use crate::domain::ports::RecordStore;
use crate::inbound::http::headers::EntityAlerts;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryRecordStore;
use crate::outbound::persistence::{DieselIncomeStore, DieselMoneyStore};

use super::ServerConfig;

/// Income and money stores, in that order.
type StorePair = (Arc<dyn RecordStore>, Arc<dyn RecordStore>);

/// Pick Diesel stores when a pool is configured, in-memory stores otherwise.
fn build_stores(config: &ServerConfig) -> StorePair {
    match &config.db_pool {
        Some(pool) => {
            info!("serving records from PostgreSQL");
            (
                Arc::new(DieselIncomeStore::new(pool.clone())),
                Arc::new(DieselMoneyStore::new(pool.clone())),
            )
        }
        None => {
            warn!("no database configured; records are kept in memory and lost on exit");
            (
                Arc::new(InMemoryRecordStore::new()),
                Arc::new(InMemoryRecordStore::new()),
            )
        }
    }
}

/// Build the shared HTTP state for `config`.
///
/// # Errors
/// Returns [`InvalidHeaderName`] when the application name cannot prefix a
/// header name.
pub(crate) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, InvalidHeaderName> {
    let alerts = EntityAlerts::new(config.app_name())?;
    let (incomes, monies) = build_stores(config);
    Ok(web::Data::new(HttpState::new(incomes, monies, alerts)))
}
