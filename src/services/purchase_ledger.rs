use std::fmt;
use std::sync::Arc;

use metrics::counter;

use crate::config::PurchaseIsolation;
use crate::db::{PurchaseRepo, WagerRepo};
use crate::errors::AppError;
use crate::models::{BuyWagerRequest, NewPurchase, PurchaseView};

use super::compensator::Compensator;
use super::wager_locks::WagerLocks;

/// Stages of the buy flow, in the order they are passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyStage {
    Validated,
    WagerFetched,
    AvailabilityChecked,
    PurchaseRecorded,
    WagerUpdated,
    Compensated,
}

impl fmt::Display for BuyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuyStage::Validated => "validated",
            BuyStage::WagerFetched => "wager_fetched",
            BuyStage::AvailabilityChecked => "availability_checked",
            BuyStage::PurchaseRecorded => "purchase_recorded",
            BuyStage::WagerUpdated => "wager_updated",
            BuyStage::Compensated => "compensated",
        };
        f.write_str(name)
    }
}

/// Executes purchases against wagers.
#[derive(Clone)]
pub struct PurchaseLedger {
    wagers: Arc<dyn WagerRepo>,
    purchases: Arc<dyn PurchaseRepo>,
    compensator: Compensator,
    locks: Option<WagerLocks>,
}

impl PurchaseLedger {
    pub fn new(
        wagers: Arc<dyn WagerRepo>,
        purchases: Arc<dyn PurchaseRepo>,
        compensator: Compensator,
        isolation: PurchaseIsolation,
    ) -> Self {
        let locks = match isolation {
            PurchaseIsolation::PerWager => Some(WagerLocks::new()),
            PurchaseIsolation::Unguarded => None,
        };

        Self {
            wagers,
            purchases,
            compensator,
            locks,
        }
    }

    /// Buy one unit of a wager at `buying_price`.
    ///
    /// If the purchase is recorded but the wager update fails, the purchase
    /// is handed to the compensator and the update error is returned.
    pub async fn buy(&self, req: &BuyWagerRequest) -> Result<PurchaseView, AppError> {
        let result = self.execute(req).await;

        match &result {
            Ok(_) => counter!("purchases_total").increment(1),
            Err(e) => {
                counter!("purchase_rejections_total", "code" => e.code().as_str()).increment(1)
            }
        }

        result
    }

    async fn execute(&self, req: &BuyWagerRequest) -> Result<PurchaseView, AppError> {
        if req.wager_id == 0 {
            return Err(AppError::InvalidWagerId);
        }

        if req.buying_price < 1.0 {
            return Err(AppError::InvalidBuyingPrice);
        }

        let mut stage = BuyStage::Validated;
        tracing::debug!(wager_id = req.wager_id, %stage, "Buy request accepted");

        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(req.wager_id).await),
            None => None,
        };

        let mut wager = self
            .wagers
            .get_wager_by_id(req.wager_id)
            .await?
            .ok_or(AppError::NotFound)?;
        stage = BuyStage::WagerFetched;

        if req.buying_price > wager.current_selling_price {
            tracing::debug!(
                wager_id = wager.id,
                %stage,
                buying_price = req.buying_price,
                current_selling_price = wager.current_selling_price,
                "Buying price above current ask"
            );
            return Err(AppError::InvalidBuyingPrice);
        }

        if wager.is_sold_out() {
            tracing::debug!(wager_id = wager.id, %stage, "Wager sold out");
            return Err(AppError::WagerSoldOut);
        }
        stage = BuyStage::AvailabilityChecked;
        tracing::debug!(wager_id = wager.id, %stage, "Wager available");

        let purchase = self
            .purchases
            .create_purchase(&NewPurchase {
                wager_id: wager.id,
                buying_price: req.buying_price,
            })
            .await?;
        stage = BuyStage::PurchaseRecorded;

        wager.record_sale(req.buying_price);

        if let Err(e) = self.wagers.update_wager(&wager).await {
            tracing::error!(
                wager_id = wager.id,
                purchase_id = purchase.id,
                %stage,
                next = %BuyStage::Compensated,
                error = %e,
                "Wager update failed, compensating purchase"
            );
            self.compensator.submit(purchase.id);
            return Err(e.into());
        }
        stage = BuyStage::WagerUpdated;

        tracing::info!(
            wager_id = wager.id,
            purchase_id = purchase.id,
            buying_price = purchase.buying_price,
            amount_sold = wager.units_sold(),
            %stage,
            "Wager purchased"
        );

        Ok(purchase.into())
    }
}
