use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use crate::config::PurchaseConfig;
use crate::db::PurchaseRepo;

/// Background worker that deletes purchases whose wager update failed.
///
/// Submissions never block and report nothing back: each delete runs on its
/// own task with its own deadline, and failures are only logged.
#[derive(Clone)]
pub struct Compensator {
    tx: mpsc::Sender<i32>,
}

#[derive(Debug, Clone, Copy)]
pub struct CompensatorLimits {
    pub timeout: Duration,
    pub max_in_flight: usize,
    pub queue_capacity: usize,
}

impl From<&PurchaseConfig> for CompensatorLimits {
    fn from(config: &PurchaseConfig) -> Self {
        Self {
            timeout: config.compensation_timeout,
            max_in_flight: config.compensation_max_in_flight,
            queue_capacity: config.compensation_queue_capacity,
        }
    }
}

impl Compensator {
    /// Start the worker loop on the current tokio runtime.
    pub fn spawn(
        purchases: Arc<dyn PurchaseRepo>,
        limits: CompensatorLimits,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(limits.queue_capacity.max(1));
        let handle = tokio::spawn(run_compensator(rx, purchases, limits));

        (Self { tx }, handle)
    }

    /// Queue a purchase for deletion.
    pub fn submit(&self, purchase_id: i32) {
        if let Err(e) = self.tx.try_send(purchase_id) {
            counter!("compensations_total", "outcome" => "dropped").increment(1);
            tracing::error!(
                purchase_id,
                error = %e,
                "Compensation queue unavailable, orphaned purchase left in place"
            );
        }
    }
}

async fn run_compensator(
    mut rx: mpsc::Receiver<i32>,
    purchases: Arc<dyn PurchaseRepo>,
    limits: CompensatorLimits,
) {
    let permits = Arc::new(Semaphore::new(limits.max_in_flight.max(1)));

    while let Some(purchase_id) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let repo = Arc::clone(&purchases);

        tokio::spawn(async move {
            let _permit = permit;
            revert_purchase(repo.as_ref(), purchase_id, limits.timeout).await;
        });
    }

    tracing::debug!("Compensation channel closed");
}

async fn revert_purchase(purchases: &dyn PurchaseRepo, purchase_id: i32, deadline: Duration) {
    match tokio::time::timeout(deadline, purchases.delete_purchase(purchase_id)).await {
        Ok(Ok(())) => {
            counter!("compensations_total", "outcome" => "deleted").increment(1);
            tracing::info!(purchase_id, "Orphaned purchase deleted");
        }
        Ok(Err(e)) => {
            counter!("compensations_total", "outcome" => "failed").increment(1);
            tracing::error!(purchase_id, error = %e, "Failed to delete orphaned purchase");
        }
        Err(_) => {
            counter!("compensations_total", "outcome" => "timed_out").increment(1);
            tracing::error!(
                purchase_id,
                timeout_ms = deadline.as_millis() as u64,
                "Deleting orphaned purchase timed out"
            );
        }
    }
}
