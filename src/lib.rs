pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::PurchaseConfig;
use crate::db::{PurchaseRepo, WagerRepo};
use crate::services::{Compensator, CompensatorLimits, PurchaseLedger, WagerCatalog};

#[derive(Clone)]
pub struct AppState {
    pub catalog: WagerCatalog,
    pub ledger: PurchaseLedger,
    pub wagers: Arc<dyn WagerRepo>,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Wire the services over the given repositories. Spawns the
    /// compensation worker, so it must run inside a tokio runtime.
    pub fn new(
        wagers: Arc<dyn WagerRepo>,
        purchases: Arc<dyn PurchaseRepo>,
        purchase_config: &PurchaseConfig,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        let (compensator, _worker) =
            Compensator::spawn(Arc::clone(&purchases), CompensatorLimits::from(purchase_config));

        Self {
            catalog: WagerCatalog::new(Arc::clone(&wagers)),
            ledger: PurchaseLedger::new(
                Arc::clone(&wagers),
                purchases,
                compensator,
                purchase_config.isolation,
            ),
            wagers,
            metrics_handle,
        }
    }
}
