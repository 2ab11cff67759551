//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! the domain services and stay testable over any `RecordStore`.

use std::sync::Arc;

use crate::domain::ports::RecordStore;
use crate::domain::{Income, Money, RecordService, Vertical};

use super::headers::EntityAlerts;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    incomes: RecordService<Income>,
    monies: RecordService<Money>,
    alerts: EntityAlerts,
}

impl HttpState {
    /// Bundle one store per resource with the alert header settings.
    pub fn new(
        income_store: Arc<dyn RecordStore>,
        money_store: Arc<dyn RecordStore>,
        alerts: EntityAlerts,
    ) -> Self {
        Self {
            incomes: RecordService::new(income_store),
            monies: RecordService::new(money_store),
            alerts,
        }
    }

    /// Alert header settings.
    pub fn alerts(&self) -> &EntityAlerts {
        &self.alerts
    }
}

/// Selects the service for resource `V`, letting one generic handler serve
/// every resource.
pub trait RecordServices<V: Vertical> {
    /// Service for `V`.
    fn records(&self) -> &RecordService<V>;
}

impl RecordServices<Income> for HttpState {
    fn records(&self) -> &RecordService<Income> {
        &self.incomes
    }
}

impl RecordServices<Money> for HttpState {
    fn records(&self) -> &RecordService<Money> {
        &self.monies
    }
}
