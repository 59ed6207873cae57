//! Shared application state.

use std::sync::Arc;

use girder_billing::BillingService;
use girder_store_sqlite::SqliteStore;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub billing: Arc<BillingService<SqliteStore>>,
    pub metrics: PrometheusHandle,
}
