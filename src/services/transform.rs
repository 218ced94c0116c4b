//! Conversions between storage rows and the caller-facing shapes.

use crate::models::{NewWager, PlaceWagerRequest, Purchase, PurchaseView, Wager, WagerView};

/// Initial entity for a validated placement: nothing sold yet and the ask
/// starts at the seller's price.
pub fn to_new_wager(req: &PlaceWagerRequest) -> NewWager {
    NewWager {
        total_wager_value: i64::from(req.total_wager_value),
        odds: i64::from(req.odds),
        selling_percentage: req.selling_percentage,
        selling_price: req.selling_price,
        current_selling_price: req.selling_price,
        percentage_sold: 0.0,
        amount_sold: 0,
    }
}

impl From<Wager> for WagerView {
    fn from(w: Wager) -> Self {
        Self {
            id: w.id,
            total_wager_value: w.total_wager_value,
            odds: w.odds,
            selling_percentage: w.selling_percentage,
            selling_price: w.selling_price,
            current_selling_price: w.current_selling_price,
            percentage_sold: w.percentage_sold.unwrap_or(0.0),
            amount_sold: w.amount_sold.unwrap_or(0),
            placed_at: w.created_at,
        }
    }
}

impl From<Purchase> for PurchaseView {
    fn from(p: Purchase) -> Self {
        Self {
            id: p.id,
            wager_id: p.wager_id,
            buying_price: p.buying_price,
            bought_at: p.created_at,
        }
    }
}
